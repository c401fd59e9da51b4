//! Core JavaScript value types and error handling.
//!
//! This crate provides the foundational types shared by the iteration
//! runtime and the generator compiler: value representation, error types,
//! and source location tracking.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`JsError`] - JavaScript errors with stack traces
//! - [`ErrorKind`] - Types of JavaScript errors
//! - [`SourcePosition`] - Source code location
//! - [`StackFrame`] - Call stack frame information
//!
//! # Examples
//!
//! ```
//! use core_types::{Value, JsError, ErrorKind};
//!
//! // Create JavaScript values
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! // Errors can be thrown as values
//! let error = JsError::type_error("undefined is not a function");
//! let thrown = Value::from(error);
//! assert_eq!(thrown.as_error().unwrap().kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
mod value;

pub use error::{ErrorKind, JsError, JsResult};
pub use source::{SourcePosition, StackFrame};
pub use value::Value;
