//! Iterator result record `{ value, done }`

use core_types::Value;

/// Iterator result object { value, done }
#[derive(Debug, Clone, PartialEq)]
pub struct IteratorResult {
    /// The value produced by the iterator
    pub value: Value,
    /// Whether the iterator is exhausted
    pub done: bool,
}

impl IteratorResult {
    /// Create a new iterator result with a value
    pub fn value(v: Value) -> Self {
        IteratorResult {
            value: v,
            done: false,
        }
    }

    /// Create a done iterator result
    pub fn done() -> Self {
        IteratorResult {
            value: Value::Undefined,
            done: true,
        }
    }

    /// Create a done result with a final value
    pub fn done_with_value(v: Value) -> Self {
        IteratorResult {
            value: v,
            done: true,
        }
    }

    /// Convert to an array pair `[value, done]` for host inspection
    pub fn to_js_value(&self) -> Value {
        Value::array(vec![self.value.clone(), Value::Boolean(self.done)])
    }

    /// Split into the produced value, or `None` once the iterator is done
    pub fn into_value(self) -> Option<Value> {
        if self.done {
            None
        } else {
            Some(self.value)
        }
    }
}
