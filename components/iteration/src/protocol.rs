//! The iterator protocol: `next`, and the optional `return` / `throw`.
//!
//! Optional operations return `None` when the producer does not implement
//! them, so callers (the delegation resolver in particular) can tell a
//! missing method apart from one that failed.

use core_types::Value;
use tracing::warn;

use crate::error::{GeneratorError, GeneratorResult};
use crate::result::IteratorResult;

/// Trait for iterator protocol
pub trait JsIterator {
    /// Get the next value, passing `resume` to the producer.
    ///
    /// Once a producer has returned a `done` result it keeps returning
    /// `{ undefined, done: true }`.
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult>;

    /// Tell the producer the consumer is finished.
    ///
    /// `None` means the producer has no `return` method.
    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        let _ = value;
        None
    }

    /// Inject an error at the producer's current suspend point.
    ///
    /// `None` means the producer has no `throw` method.
    fn throw(&mut self, error: Value) -> Option<GeneratorResult<IteratorResult>> {
        let _ = error;
        None
    }
}

/// Owned, type-erased iterator
pub type BoxedIterator = Box<dyn JsIterator>;

impl<I: JsIterator + ?Sized> JsIterator for Box<I> {
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult> {
        (**self).next(resume)
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        (**self).return_value(value)
    }

    fn throw(&mut self, error: Value) -> Option<GeneratorResult<IteratorResult>> {
        (**self).throw(error)
    }
}

/// Wrapper that turns contract breaches of the wrapped producer into
/// [`GeneratorError::ProtocolViolation`].
///
/// Tracked breaches:
/// - a value after the producer already reported `done`;
/// - a value in answer to `return`.
pub struct ProtocolGuard<I> {
    inner: I,
    finished: bool,
}

impl<I: JsIterator> ProtocolGuard<I> {
    /// Guard a producer
    pub fn new(inner: I) -> Self {
        ProtocolGuard {
            inner,
            finished: false,
        }
    }

    /// Whether the producer has reported completion
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Unwrap the guarded producer
    pub fn into_inner(self) -> I {
        self.inner
    }

    fn check(&mut self, operation: &str, result: IteratorResult) -> GeneratorResult<IteratorResult> {
        if result.done {
            self.finished = true;
            return Ok(result);
        }
        if self.finished {
            warn!(operation, "iterator produced a value after completion");
            return Err(GeneratorError::ProtocolViolation(format!(
                "{} produced a value after the iterator reported done",
                operation
            )));
        }
        Ok(result)
    }
}

impl<I: JsIterator> JsIterator for ProtocolGuard<I> {
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult> {
        let result = self.inner.next(resume);
        match result {
            Ok(r) => self.check("next", r),
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        let result = self.inner.return_value(value)?;
        self.finished = true;
        Some(match result {
            Ok(r) if !r.done => {
                warn!("iterator produced a value in answer to return");
                Err(GeneratorError::ProtocolViolation(
                    "return produced a value instead of completing".to_string(),
                ))
            }
            other => other,
        })
    }

    fn throw(&mut self, error: Value) -> Option<GeneratorResult<IteratorResult>> {
        let result = self.inner.throw(error)?;
        Some(match result {
            Ok(r) => self.check("throw", r),
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        })
    }
}
