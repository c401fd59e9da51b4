//! Error types for iteration and generator execution

use core_types::{JsError, Value};
use thiserror::Error;

/// Errors surfaced by `next`, `return` and `throw`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// A producer broke the iterator contract (a defect, not a recoverable error)
    #[error("iterator protocol violation: {0}")]
    ProtocolViolation(String),

    /// A value injected with `throw` that no handler caught
    #[error("uncaught injected error: {0}")]
    Injected(Value),

    /// An uncaught error raised while running a step
    #[error("uncaught error: {0}")]
    StepFailure(Value),

    /// `next`/`return`/`throw` was called while the same instance was executing
    #[error("TypeError: Generator is already running")]
    AlreadyRunning,
}

impl GeneratorError {
    /// Step failure carrying a host error
    pub fn step(error: JsError) -> Self {
        GeneratorError::StepFailure(Value::from(error))
    }

    /// The JavaScript value a catch clause would observe for this error.
    ///
    /// Protocol violations are defects and have no catchable value.
    pub fn thrown_value(&self) -> Option<Value> {
        match self {
            GeneratorError::Injected(v) | GeneratorError::StepFailure(v) => Some(v.clone()),
            GeneratorError::AlreadyRunning => Some(Value::from(JsError::type_error(
                "Generator is already running",
            ))),
            GeneratorError::ProtocolViolation(_) => None,
        }
    }

    /// Whether this error started life as a `throw(e)` call
    pub fn is_injected(&self) -> bool {
        matches!(self, GeneratorError::Injected(_))
    }
}

impl From<JsError> for GeneratorError {
    fn from(error: JsError) -> Self {
        GeneratorError::step(error)
    }
}

/// Result type for protocol operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;
