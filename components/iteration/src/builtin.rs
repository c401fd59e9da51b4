//! Built-in iterators for arrays, strings and host closures

use core_types::Value;

use crate::error::GeneratorResult;
use crate::protocol::JsIterator;
use crate::result::IteratorResult;

/// Kind of iterator (keys, values, or entries)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IteratorKind {
    /// Iterate over keys (indices)
    Keys,
    /// Iterate over values
    Values,
    /// Iterate over [key, value] pairs
    Entries,
}

/// Array iterator implementation
#[derive(Debug, Clone)]
pub struct ArrayIterator {
    array: Value,
    index: usize,
    kind: IteratorKind,
}

impl ArrayIterator {
    /// Iterate over values
    pub fn new(array: Value) -> Self {
        Self::with_kind(array, IteratorKind::Values)
    }

    /// Iterate over indices
    pub fn keys(array: Value) -> Self {
        Self::with_kind(array, IteratorKind::Keys)
    }

    /// Iterate over `[index, value]` pairs
    pub fn entries(array: Value) -> Self {
        Self::with_kind(array, IteratorKind::Entries)
    }

    fn with_kind(array: Value, kind: IteratorKind) -> Self {
        ArrayIterator {
            array,
            index: 0,
            kind,
        }
    }
}

impl JsIterator for ArrayIterator {
    fn next(&mut self, _resume: Value) -> GeneratorResult<IteratorResult> {
        let element = match &self.array {
            Value::Array(items) => items.get(self.index).cloned(),
            _ => None,
        };
        let Some(element) = element else {
            // stay exhausted even if the index would be valid later
            self.index = usize::MAX;
            return Ok(IteratorResult::done());
        };

        let key = Value::number(self.index as f64);
        self.index += 1;
        Ok(IteratorResult::value(match self.kind {
            IteratorKind::Keys => key,
            IteratorKind::Values => element,
            IteratorKind::Entries => Value::array(vec![key, element]),
        }))
    }
}

/// String iterator implementation, one Unicode scalar at a time
#[derive(Debug, Clone)]
pub struct StringIterator {
    string: String,
    offset: usize,
}

impl StringIterator {
    /// Create a new string iterator
    pub fn new(s: impl Into<String>) -> Self {
        StringIterator {
            string: s.into(),
            offset: 0,
        }
    }
}

impl JsIterator for StringIterator {
    fn next(&mut self, _resume: Value) -> GeneratorResult<IteratorResult> {
        match self.string[self.offset..].chars().next() {
            Some(ch) => {
                self.offset += ch.len_utf8();
                Ok(IteratorResult::value(Value::string(ch.to_string())))
            }
            None => Ok(IteratorResult::done()),
        }
    }
}

/// Iterator backed by a host closure.
///
/// The closure receives the resume value and returns `None` when exhausted;
/// it is never called again after that.
pub struct FnIterator<F> {
    producer: Option<F>,
}

impl<F> FnIterator<F>
where
    F: FnMut(Value) -> GeneratorResult<Option<Value>>,
{
    /// Wrap a producer closure
    pub fn new(producer: F) -> Self {
        FnIterator {
            producer: Some(producer),
        }
    }
}

impl<F> JsIterator for FnIterator<F>
where
    F: FnMut(Value) -> GeneratorResult<Option<Value>>,
{
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult> {
        let Some(producer) = self.producer.as_mut() else {
            return Ok(IteratorResult::done());
        };
        match producer(resume) {
            Ok(Some(value)) => Ok(IteratorResult::value(value)),
            Ok(None) => {
                self.producer = None;
                Ok(IteratorResult::done())
            }
            Err(e) => {
                self.producer = None;
                Err(e)
            }
        }
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        self.producer = None;
        Some(Ok(IteratorResult::done_with_value(value)))
    }
}
