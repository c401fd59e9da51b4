//! Iterator helper methods (map, filter, take, drop, ...)
//!
//! Every helper drives the iterator through [`drive`], so a helper that
//! stops before exhaustion closes the iterator it was given.

use std::ops::ControlFlow;

use core_types::Value;

use crate::error::GeneratorResult;
use crate::iterable::drive;
use crate::protocol::JsIterator;

/// Eager helpers over any iterator
pub struct IteratorHelpers;

impl IteratorHelpers {
    /// Collect every remaining value
    pub fn to_array(iter: &mut dyn JsIterator) -> GeneratorResult<Vec<Value>> {
        let mut results = vec![];
        drive(iter, |v| {
            results.push(v);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(results)
    }

    /// Map over iterator values
    pub fn map<F>(iter: &mut dyn JsIterator, mut mapper: F) -> GeneratorResult<Vec<Value>>
    where
        F: FnMut(Value) -> GeneratorResult<Value>,
    {
        let mut results = vec![];
        drive(iter, |v| {
            results.push(mapper(v)?);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(results)
    }

    /// Filter iterator values
    pub fn filter<F>(iter: &mut dyn JsIterator, mut predicate: F) -> GeneratorResult<Vec<Value>>
    where
        F: FnMut(&Value) -> bool,
    {
        let mut results = vec![];
        drive(iter, |v| {
            if predicate(&v) {
                results.push(v);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(results)
    }

    /// Take first n values from iterator
    pub fn take(iter: &mut dyn JsIterator, n: usize) -> GeneratorResult<Vec<Value>> {
        let mut results = vec![];
        if n == 0 {
            crate::iterable::close(iter)?;
            return Ok(results);
        }
        drive(iter, |v| {
            results.push(v);
            Ok(if results.len() == n {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })?;
        Ok(results)
    }

    /// Drop first n values from iterator, collecting the rest
    pub fn drop(iter: &mut dyn JsIterator, n: usize) -> GeneratorResult<Vec<Value>> {
        let mut skipped = 0;
        let mut results = vec![];
        drive(iter, |v| {
            if skipped < n {
                skipped += 1;
            } else {
                results.push(v);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(results)
    }

    /// Reduce iterator to a single value
    pub fn reduce<F>(iter: &mut dyn JsIterator, init: Value, mut reducer: F) -> GeneratorResult<Value>
    where
        F: FnMut(Value, Value) -> GeneratorResult<Value>,
    {
        let mut acc = Some(init);
        drive(iter, |v| {
            let current = acc.take().unwrap_or(Value::Undefined);
            acc = Some(reducer(current, v)?);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(acc.unwrap_or(Value::Undefined))
    }

    /// Call a function for each value
    pub fn for_each<F>(iter: &mut dyn JsIterator, mut callback: F) -> GeneratorResult<()>
    where
        F: FnMut(Value) -> GeneratorResult<()>,
    {
        drive(iter, |v| {
            callback(v)?;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(())
    }

    /// First value matching the predicate
    pub fn find<F>(iter: &mut dyn JsIterator, mut predicate: F) -> GeneratorResult<Option<Value>>
    where
        F: FnMut(&Value) -> bool,
    {
        let mut found = None;
        drive(iter, |v| {
            if predicate(&v) {
                found = Some(v);
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    /// Whether any value matches
    pub fn some<F>(iter: &mut dyn JsIterator, predicate: F) -> GeneratorResult<bool>
    where
        F: FnMut(&Value) -> bool,
    {
        Ok(Self::find(iter, predicate)?.is_some())
    }

    /// Whether every value matches
    pub fn every<F>(iter: &mut dyn JsIterator, mut predicate: F) -> GeneratorResult<bool>
    where
        F: FnMut(&Value) -> bool,
    {
        Ok(Self::find(iter, |v| !predicate(v))?.is_none())
    }
}
