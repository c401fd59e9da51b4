//! Resumable state machines and the generator handle that drives them.
//!
//! A generator is split in two:
//! - a [`StateMachine`]: an explicit state struct whose fields are the locals
//!   live across suspend points, advanced by a `match` on a tagged state;
//! - a [`Generator`]: the shared handle consumers call `next`/`return`/`throw`
//!   on. It owns the lifecycle (`NotStarted` → `SuspendedAtStep(k)` →
//!   `Completed`), idempotent exhaustion, failure handling and delegation.
//!
//! The machine never loops over a delegated iterator itself. It answers
//! [`Step::Delegate`] and the handle trampolines the inner iterator until it
//! completes, then resumes the machine with the inner iterator's final value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use core_types::{JsError, Value};
use tracing::{debug, trace};

use crate::config::RuntimeConfig;
use crate::delegation::{DelegateOutcome, Delegation};
use crate::error::{GeneratorError, GeneratorResult};
use crate::iterable::Iterable;
use crate::protocol::{BoxedIterator, JsIterator};
use crate::result::IteratorResult;

/// Generator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Created, no step has run yet
    NotStarted,
    /// Paused at the given suspend point
    SuspendedAtStep(usize),
    /// A step is running right now (only observable re-entrantly)
    Executing,
    /// Returned, failed, or was closed; inert from now on
    Completed,
}

/// Where an in-flight error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowOrigin {
    /// Injected by a consumer through `throw`
    Injected,
    /// Raised while running a step
    Step,
}

/// An error travelling through a machine's handlers
#[derive(Debug, Clone, PartialEq)]
pub struct Thrown {
    /// The thrown value
    pub value: Value,
    /// Whether it was injected or raised internally
    pub origin: ThrowOrigin,
}

impl Thrown {
    /// Error injected through `throw(e)`
    pub fn injected(value: Value) -> Self {
        Thrown {
            value,
            origin: ThrowOrigin::Injected,
        }
    }

    /// Error raised by step execution
    pub fn step(value: Value) -> Self {
        Thrown {
            value,
            origin: ThrowOrigin::Step,
        }
    }

    /// The error a caller sees when nothing handled this throw
    pub fn into_error(self) -> GeneratorError {
        match self.origin {
            ThrowOrigin::Injected => GeneratorError::Injected(self.value),
            ThrowOrigin::Step => GeneratorError::StepFailure(self.value),
        }
    }
}

impl From<JsError> for Thrown {
    fn from(error: JsError) -> Self {
        Thrown::step(Value::from(error))
    }
}

/// How a machine is being resumed
#[derive(Debug, Clone, PartialEq)]
pub enum Resume {
    /// `next(value)`: the value is the result of the pending suspend expression
    Next(Value),
    /// `throw(e)`, or an error raised at a delegation point
    Throw(Thrown),
    /// `return(value)`: unwind through cleanup and complete
    Return(Value),
}

/// Abrupt resumption split off by [`Resume::sent`]
#[derive(Debug, Clone, PartialEq)]
pub enum Abrupt {
    /// Pending throw
    Throw(Thrown),
    /// Pending return
    Return(Value),
}

impl Abrupt {
    /// Complete the machine without any handler or cleanup at this point
    pub fn complete(self) -> GeneratorResult<Step> {
        match self {
            Abrupt::Return(value) => Ok(Step::Return(value)),
            Abrupt::Throw(thrown) => Err(thrown.into_error()),
        }
    }
}

impl Resume {
    /// The sent value for `next`, or the abrupt completion to deal with.
    ///
    /// Machines without handlers at a suspend point can simply write
    /// `let x = match input.sent() { Ok(v) => v, Err(a) => return a.complete() };`
    pub fn sent(self) -> Result<Value, Abrupt> {
        match self {
            Resume::Next(value) => Ok(value),
            Resume::Throw(thrown) => Err(Abrupt::Throw(thrown)),
            Resume::Return(value) => Err(Abrupt::Return(value)),
        }
    }
}

/// What a machine did with one resumption
pub enum Step {
    /// Suspend, emitting the value
    Yield(Value),
    /// Suspend and drain the iterator; its final value resumes the machine
    Delegate(BoxedIterator),
    /// Complete with the return value
    Return(Value),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Yield(v) => f.debug_tuple("Yield").field(v).finish(),
            Step::Delegate(_) => write!(f, "Delegate(..)"),
            Step::Return(v) => f.debug_tuple("Return").field(v).finish(),
        }
    }
}

/// A generator body desugared into an explicit resumable machine.
///
/// The first resumption is always `Resume::Next(undefined)`. Returning an
/// error completes the machine; the handle never resumes it again.
pub trait StateMachine {
    /// Run from the current suspend point to the next one
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step>;

    /// Ordinal of the suspend point the machine is paused at
    fn suspend_point(&self) -> usize;
}

thread_local! {
    static ACTIVE_STEPS: Cell<usize> = Cell::new(0);
}

/// Counts nested executing steps on this thread
struct NestingGuard;

impl NestingGuard {
    fn enter(limit: usize) -> Result<Self, JsError> {
        ACTIVE_STEPS.with(|active| {
            let depth = active.get();
            if depth >= limit {
                return Err(JsError::range_error(format!(
                    "Maximum generator nesting depth exceeded ({})",
                    limit
                )));
            }
            active.set(depth + 1);
            Ok(NestingGuard)
        })
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        ACTIVE_STEPS.with(|active| active.set(active.get().saturating_sub(1)));
    }
}

struct GeneratorCore<M> {
    name: Rc<str>,
    /// Dropped at completion so captured locals are released
    machine: Option<M>,
    state: GeneratorState,
    delegation: Option<Delegation>,
    config: RuntimeConfig,
}

impl<M: StateMachine> GeneratorCore<M> {
    fn finish(&mut self) {
        self.state = GeneratorState::Completed;
        self.machine = None;
        self.delegation = None;
        debug!(generator = %self.name, "generator completed");
    }

    fn run(&mut self, input: Resume) -> GeneratorResult<IteratorResult> {
        let mut input = match self.state {
            GeneratorState::Completed => return completed_response(input),
            GeneratorState::NotStarted => match input {
                // nothing is waiting for the first value
                Resume::Next(_) => Resume::Next(Value::Undefined),
                Resume::Return(value) => {
                    debug!(generator = %self.name, "closed before start");
                    self.finish();
                    return Ok(IteratorResult::done_with_value(value));
                }
                Resume::Throw(thrown) => {
                    debug!(generator = %self.name, "error injected before start");
                    self.finish();
                    return Err(thrown.into_error());
                }
            },
            GeneratorState::SuspendedAtStep(_) | GeneratorState::Executing => input,
        };

        let _nesting = match NestingGuard::enter(self.config.max_nesting_depth) {
            Ok(guard) => Some(guard),
            // a suspended body gets to handle the failure and run its cleanup
            Err(error) if matches!(self.state, GeneratorState::SuspendedAtStep(_)) => {
                debug!(generator = %self.name, %error, "nesting limit reached at resume");
                input = Resume::Throw(Thrown::from(error));
                None
            }
            Err(error) => {
                self.finish();
                return Err(GeneratorError::step(error));
            }
        };

        loop {
            if let Some(delegation) = self.delegation.as_mut() {
                match delegation.forward(input) {
                    DelegateOutcome::Emit(value) => {
                        trace!(generator = %self.name, "re-emitting delegated value");
                        return Ok(IteratorResult::value(value));
                    }
                    DelegateOutcome::Finished(value) => {
                        debug!(generator = %self.name, "delegation finished");
                        self.delegation = None;
                        input = Resume::Next(value);
                    }
                    DelegateOutcome::Unwind(value) => {
                        debug!(generator = %self.name, "delegated iterator closed by return");
                        self.delegation = None;
                        input = Resume::Return(value);
                    }
                    DelegateOutcome::Raise(thrown) => {
                        debug!(generator = %self.name, "error raised at delegation point");
                        self.delegation = None;
                        input = Resume::Throw(thrown);
                    }
                    DelegateOutcome::Fatal(error) => {
                        self.finish();
                        return Err(error);
                    }
                }
            }

            let Some(machine) = self.machine.as_mut() else {
                return completed_response(input);
            };

            match machine.resume(input) {
                Ok(Step::Yield(value)) => {
                    let point = machine.suspend_point();
                    self.state = GeneratorState::SuspendedAtStep(point);
                    trace!(generator = %self.name, point, "suspended");
                    return Ok(IteratorResult::value(value));
                }
                Ok(Step::Delegate(iterator)) => {
                    let point = machine.suspend_point();
                    self.state = GeneratorState::SuspendedAtStep(point);
                    debug!(generator = %self.name, point, "delegating");
                    self.delegation = Some(Delegation::new(iterator, self.config.strict_protocol));
                    input = Resume::Next(Value::Undefined);
                }
                Ok(Step::Return(value)) => {
                    self.finish();
                    return Ok(IteratorResult::done_with_value(value));
                }
                Err(error) => {
                    debug!(generator = %self.name, %error, "step failed");
                    self.finish();
                    return Err(error);
                }
            }
        }
    }
}

fn completed_response(input: Resume) -> GeneratorResult<IteratorResult> {
    match input {
        Resume::Next(_) => Ok(IteratorResult::done()),
        Resume::Return(value) => Ok(IteratorResult::done_with_value(value)),
        Resume::Throw(thrown) => Err(thrown.into_error()),
    }
}

/// Shared generator handle.
///
/// Clones share one underlying generator, which is what makes a generator
/// its own iterable: `make_iterator` hands out another handle to the same
/// state.
pub struct Generator<M> {
    name: Rc<str>,
    core: Rc<RefCell<GeneratorCore<M>>>,
}

impl<M> Clone for Generator<M> {
    fn clone(&self) -> Self {
        Generator {
            name: Rc::clone(&self.name),
            core: Rc::clone(&self.core),
        }
    }
}

impl<M: StateMachine> Generator<M> {
    /// Wrap a machine with the default configuration
    pub fn new(machine: M) -> Self {
        Self::with_config(machine, RuntimeConfig::default())
    }

    /// Wrap a machine with an explicit configuration
    pub fn with_config(machine: M, config: RuntimeConfig) -> Self {
        Self::named("<anonymous>", machine, config)
    }

    /// Wrap a machine under a name used in log events
    pub fn named(name: impl Into<String>, machine: M, config: RuntimeConfig) -> Self {
        let name: Rc<str> = Rc::from(name.into());
        debug!(
            generator = %name,
            max_nesting_depth = config.max_nesting_depth,
            "generator created"
        );
        Generator {
            name: Rc::clone(&name),
            core: Rc::new(RefCell::new(GeneratorCore {
                name,
                machine: Some(machine),
                state: GeneratorState::NotStarted,
                delegation: None,
                config,
            })),
        }
    }

    /// Name given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> GeneratorState {
        match self.core.try_borrow() {
            Ok(core) => core.state,
            Err(_) => GeneratorState::Executing,
        }
    }

    /// Whether the generator has completed
    pub fn is_done(&self) -> bool {
        self.state() == GeneratorState::Completed
    }

    /// Whether a delegated iterator is currently being drained
    pub fn is_delegating(&self) -> bool {
        self.core
            .try_borrow()
            .map(|core| core.delegation.is_some())
            .unwrap_or(false)
    }

    /// Inspect the machine; `None` once completed or while executing
    pub fn with_machine<R>(&self, f: impl FnOnce(&M) -> R) -> Option<R> {
        let core = self.core.try_borrow().ok()?;
        core.machine.as_ref().map(f)
    }

    /// Resume the generator
    pub fn resume(&self, input: Resume) -> GeneratorResult<IteratorResult> {
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| GeneratorError::AlreadyRunning)?;
        core.run(input)
    }

    /// Generator.prototype.next(value)
    pub fn next(&self, value: Value) -> GeneratorResult<IteratorResult> {
        self.resume(Resume::Next(value))
    }

    /// Generator.prototype.return(value)
    pub fn return_value(&self, value: Value) -> GeneratorResult<IteratorResult> {
        self.resume(Resume::Return(value))
    }

    /// Generator.prototype.throw(exception)
    pub fn throw(&self, exception: Value) -> GeneratorResult<IteratorResult> {
        self.resume(Resume::Throw(Thrown::injected(exception)))
    }
}

impl<M: StateMachine> JsIterator for Generator<M> {
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult> {
        self.resume(Resume::Next(resume))
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        Some(self.resume(Resume::Return(value)))
    }

    fn throw(&mut self, error: Value) -> Option<GeneratorResult<IteratorResult>> {
        Some(self.resume(Resume::Throw(Thrown::injected(error))))
    }
}

impl<M: StateMachine + 'static> Iterable for Generator<M> {
    fn make_iterator(&self) -> GeneratorResult<BoxedIterator> {
        Ok(Box::new(self.clone()))
    }
}

impl<M> fmt::Debug for Generator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core.try_borrow() {
            Ok(core) => f
                .debug_struct("Generator")
                .field("name", &self.name)
                .field("state", &core.state)
                .field("delegating", &core.delegation.is_some())
                .finish(),
            Err(_) => f
                .debug_struct("Generator")
                .field("name", &self.name)
                .field("state", &GeneratorState::Executing)
                .finish(),
        }
    }
}
