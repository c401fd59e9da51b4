//! Compiled generator functions

use std::fmt;
use std::rc::Rc;

use core_types::{JsError, Value};
use iteration::{
    iterable_value, BoxedIterator, Generator, GeneratorResult, Iterable, RuntimeConfig,
};
use tracing::debug;

use crate::ast::GeneratorDecl;
use crate::exec::CompiledMachine;
use crate::liveness;
use crate::lower::lower;
use crate::program::Program;

/// A generator function: calling it produces a fresh generator.
///
/// # Example
///
/// ```
/// use core_types::Value;
/// use generator_compiler::{Expr, GeneratorDecl, GeneratorFunction, Stmt};
///
/// let decl = GeneratorDecl::new(
///     "count",
///     &[],
///     vec![
///         Stmt::yield_(Expr::int(1)),
///         Stmt::yield_(Expr::int(2)),
///     ],
/// );
/// let count = GeneratorFunction::compile(&decl).unwrap();
///
/// let generator = count.instantiate(&[]);
/// assert_eq!(generator.next(Value::Undefined).unwrap().value, Value::Smi(1));
/// assert_eq!(generator.next(Value::Undefined).unwrap().value, Value::Smi(2));
/// assert!(generator.next(Value::Undefined).unwrap().done);
/// ```
pub struct GeneratorFunction {
    program: Rc<Program>,
    config: RuntimeConfig,
}

impl GeneratorFunction {
    /// Compile with the default configuration
    pub fn compile(decl: &GeneratorDecl) -> Result<Self, JsError> {
        Self::compile_with_config(decl, RuntimeConfig::default())
    }

    /// Compile with an explicit configuration for every instance
    pub fn compile_with_config(decl: &GeneratorDecl, config: RuntimeConfig) -> Result<Self, JsError> {
        let mut program = lower(decl)?;
        liveness::analyze(&mut program);
        debug!(
            generator = %program.name,
            ops = program.ops.len(),
            suspend_points = program.suspend_count(),
            lifted = ?program.lifted_names(),
            "compiled generator"
        );
        Ok(GeneratorFunction {
            program: Rc::new(program),
            config,
        })
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.program.name
    }

    /// Lowered program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Configuration given to every instance
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Call the function: a new generator with its own frame.
    ///
    /// Missing arguments are undefined; extra ones are ignored.
    pub fn instantiate(&self, args: &[Value]) -> Generator<CompiledMachine> {
        let machine = CompiledMachine::new(Rc::clone(&self.program), args);
        Generator::named(self.program.name.clone(), machine, self.config.clone())
    }

    /// Call the function, returning the generator as a value
    pub fn call(&self, args: &[Value]) -> Value {
        iterable_value(self.instantiate(args))
    }
}

impl Iterable for GeneratorFunction {
    fn make_iterator(&self) -> GeneratorResult<BoxedIterator> {
        Ok(Box::new(self.instantiate(&[])))
    }
}

impl fmt::Debug for GeneratorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function* {}", self.program.name)
    }
}
