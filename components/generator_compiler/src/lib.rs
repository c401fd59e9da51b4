//! Generator-to-state-machine compiler
//!
//! This crate turns generator bodies into resumable state machines:
//! - Block scope resolution of names to frame slots
//! - Lowering to flat ops with numbered suspend points and try regions
//! - Liveness analysis deciding which locals survive suspensions
//! - A [`CompiledMachine`] that runs the ops under an `iteration::Generator`
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use generator_compiler::{Expr, GeneratorDecl, GeneratorFunction, Rhs, Stmt};
//!
//! // function* logger() { const x = yield 10; return x; }
//! let decl = GeneratorDecl::new(
//!     "logger",
//!     &[],
//!     vec![
//!         Stmt::let_("x", Rhs::Yield(Expr::int(10))),
//!         Stmt::ret(Expr::local("x")),
//!     ],
//! );
//! let logger = GeneratorFunction::compile(&decl).unwrap();
//! let generator = logger.instantiate(&[]);
//!
//! assert_eq!(generator.next(Value::Undefined).unwrap().value, Value::Smi(10));
//! let last = generator.next(Value::string("sent")).unwrap();
//! assert!(last.done);
//! assert_eq!(last.value, Value::string("sent"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ast;
pub mod exec;
pub mod function;
pub mod liveness;
pub mod lower;
pub mod operators;
pub mod program;
pub mod scope;

// Re-export main types at crate root
pub use ast::{BinaryOp, CatchClause, Expr, GeneratorDecl, HostFunction, Rhs, Stmt};
pub use exec::CompiledMachine;
pub use function::GeneratorFunction;
pub use lower::{lower, Lowerer};
pub use program::{Handler, Op, Operand, Program, Slot, TryRegion};
pub use scope::ScopeChain;
