//! Iterator protocol and generator runtime
//!
//! This crate provides:
//! - The iterator protocol (`next`, optional `return` / `throw`)
//! - Iterables, the `for...of` driving loop, and built-in iterators
//! - Resumable state machines and the generator handle that drives them
//! - `yield*` delegation with protocol checking
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use iteration::{Generator, GeneratorResult, Resume, StateMachine, Step};
//!
//! /// function* () { const x = yield 10; return x; }
//! struct Echo {
//!     point: usize,
//! }
//!
//! impl StateMachine for Echo {
//!     fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
//!         let sent = match input.sent() {
//!             Ok(v) => v,
//!             Err(abrupt) => return abrupt.complete(),
//!         };
//!         self.point += 1;
//!         match self.point {
//!             1 => Ok(Step::Yield(Value::Smi(10))),
//!             _ => Ok(Step::Return(sent)),
//!         }
//!     }
//!
//!     fn suspend_point(&self) -> usize {
//!         self.point
//!     }
//! }
//!
//! let generator = Generator::new(Echo { point: 0 });
//! assert_eq!(generator.next(Value::Undefined).unwrap().value, Value::Smi(10));
//! let last = generator.next(Value::string("hi")).unwrap();
//! assert!(last.done);
//! assert_eq!(last.value, Value::string("hi"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod builtin;
pub mod config;
mod delegation;
pub mod error;
pub mod helpers;
pub mod iterable;
pub mod machine;
pub mod protocol;
pub mod result;

// Re-export main types for convenience
pub use builtin::{ArrayIterator, FnIterator, IteratorKind, StringIterator};
pub use config::{RuntimeConfig, DEFAULT_MAX_NESTING_DEPTH};
pub use error::{GeneratorError, GeneratorResult};
pub use helpers::IteratorHelpers;
pub use iterable::{
    drive, for_of, for_of_value, get_iterator, iterable_value, Iterable, IterableObject,
    SharedIterator,
};
pub use machine::{
    Abrupt, Generator, GeneratorState, Resume, StateMachine, Step, ThrowOrigin, Thrown,
};
pub use protocol::{BoxedIterator, JsIterator, ProtocolGuard};
pub use result::IteratorResult;
