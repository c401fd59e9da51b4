//! Errors raised by generator bodies, host functions and the compiler.

use std::fmt;

use crate::{SourcePosition, StackFrame};

/// Which built-in error constructor an error belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Generic `Error`
    Error,
    /// Syntax error in a generator body
    SyntaxError,
    /// Type error (e.g. resuming a running generator)
    TypeError,
    /// Reference to an undeclared binding
    ReferenceError,
    /// Value out of allowed range (e.g. nesting limit)
    RangeError,
}

impl ErrorKind {
    /// Get the error name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::RangeError => "RangeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An error value: kind, message and the frames it unwound through.
///
/// Thrown into or out of a generator it travels as [`crate::Value::Error`].
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError::type_error("undefined is not a function");
///
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(error.message, "undefined is not a function");
/// assert_eq!(error.to_string(), "TypeError: undefined is not a function");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Stack trace (call stack at the time of the error)
    pub stack: Vec<StackFrame>,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
}

impl JsError {
    /// Create an error of the given kind with an empty stack
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        JsError {
            kind,
            message: message.into(),
            stack: vec![],
            source_position: None,
        }
    }

    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::TypeError, message)
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::RangeError, message)
    }

    /// Create a ReferenceError
    pub fn reference_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::ReferenceError, message)
    }

    /// Create a SyntaxError
    pub fn syntax_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::SyntaxError, message)
    }

    /// Push a frame onto the stack trace
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.stack.push(frame);
        self
    }

    /// Record where the error was raised; the innermost position wins
    pub fn with_position(mut self, position: SourcePosition) -> Self {
        if self.source_position.is_none() {
            self.source_position = Some(position);
        }
        self
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for JsError {}

/// Result type for host operations that may raise a JavaScript error
pub type JsResult<T> = Result<T, JsError>;
