//! `yield*` resolution: forwarding a generator's resumptions to an inner
//! iterator until it completes.

use core_types::Value;
use tracing::{debug, warn};

use crate::error::{GeneratorError, GeneratorResult};
use crate::machine::{Resume, Thrown};
use crate::protocol::{BoxedIterator, JsIterator, ProtocolGuard};
use crate::result::IteratorResult;

/// What the outer generator must do after one forwarded resumption
#[derive(Debug)]
pub(crate) enum DelegateOutcome {
    /// Inner produced a value; the outer re-emits it and stays suspended
    Emit(Value),
    /// Inner completed; its final value is the result of the delegation
    Finished(Value),
    /// Inner was closed by `return`; the outer unwinds with this value
    Unwind(Value),
    /// An error surfaces at the delegation point, catchable by the outer body
    Raise(Thrown),
    /// Strict protocol breach; the outer completes with this error
    Fatal(GeneratorError),
}

/// An active delegation
pub(crate) struct Delegation {
    inner: ProtocolGuard<BoxedIterator>,
    strict: bool,
}

impl Delegation {
    pub(crate) fn new(inner: BoxedIterator, strict: bool) -> Self {
        Delegation {
            inner: ProtocolGuard::new(inner),
            strict,
        }
    }

    /// Forward one resumption to the inner iterator
    pub(crate) fn forward(&mut self, input: Resume) -> DelegateOutcome {
        match input {
            Resume::Next(value) => {
                let result = self.inner.next(value);
                self.settle(result)
            }
            Resume::Throw(thrown) => match self.inner.throw(thrown.value.clone()) {
                Some(result) => self.settle(result),
                None => {
                    debug!("delegated iterator has no throw; closing it");
                    if let Some(Err(error)) = self.inner.return_value(Value::Undefined) {
                        return self.fail(error, DelegateOutcome::Raise(thrown));
                    }
                    DelegateOutcome::Raise(thrown)
                }
            },
            Resume::Return(value) => match self.inner.return_value(value.clone()) {
                None => DelegateOutcome::Unwind(value),
                Some(Ok(result)) => DelegateOutcome::Unwind(result.value),
                Some(Err(error)) => self.fail(error, DelegateOutcome::Unwind(Value::Undefined)),
            },
        }
    }

    fn settle(&self, result: GeneratorResult<IteratorResult>) -> DelegateOutcome {
        match result {
            Ok(r) if r.done => DelegateOutcome::Finished(r.value),
            Ok(r) => DelegateOutcome::Emit(r.value),
            Err(error) => self.fail(error, DelegateOutcome::Finished(Value::Undefined)),
        }
    }

    /// Map an inner failure; `lenient` is used for protocol breaches when
    /// strict checking is off
    fn fail(&self, error: GeneratorError, lenient: DelegateOutcome) -> DelegateOutcome {
        match error {
            GeneratorError::ProtocolViolation(reason) => {
                if self.strict {
                    DelegateOutcome::Fatal(GeneratorError::ProtocolViolation(reason))
                } else {
                    warn!(%reason, "ignoring protocol violation from delegated iterator");
                    lenient
                }
            }
            GeneratorError::Injected(value) => DelegateOutcome::Raise(Thrown::injected(value)),
            other => {
                let value = other.thrown_value().unwrap_or(Value::Undefined);
                DelegateOutcome::Raise(Thrown::step(value))
            }
        }
    }
}
