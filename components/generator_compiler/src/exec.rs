//! Execution of lowered programs as resumable state machines

use std::rc::Rc;

use core_types::{JsError, SourcePosition, StackFrame, Value};
use iteration::{
    get_iterator, iterable_value, GeneratorError, GeneratorResult, Resume, StateMachine, Step,
    Thrown,
};
use tracing::trace;

use crate::operators;
use crate::program::{Op, Operand, Program, Slot};

/// A completion travelling through `finally` blocks
#[derive(Debug, Clone)]
enum Completion {
    Throw(Thrown),
    Return(Value),
}

/// Result of unwinding an abrupt completion
enum Flow {
    /// A handler or finally block took over at `pc`
    Continue,
    /// Nothing intercepted a return
    Complete(Value),
}

/// What one op did
enum Control {
    Goto(usize),
    Suspend(Step),
    Abrupt(Completion),
}

/// State machine running a compiled generator body.
///
/// The frame holds every slot; transient slots are cleared at each
/// suspension, so only lifted locals carry values from one step to the next.
pub struct CompiledMachine {
    program: Rc<Program>,
    frame: Vec<Value>,
    pc: usize,
    /// Op index of the suspend op the machine is paused at
    suspended_at: Option<usize>,
    /// Slot receiving the value of the pending suspend expression
    pending_bind: Option<Slot>,
    /// Completion that entered each region's finally block
    pending: Vec<Option<Completion>>,
    point: usize,
}

impl CompiledMachine {
    /// Create a machine with parameters bound from `args`
    pub fn new(program: Rc<Program>, args: &[Value]) -> Self {
        let mut frame = vec![Value::Undefined; program.slot_count()];
        for (slot, arg) in frame.iter_mut().zip(args).take(program.param_count) {
            *slot = arg.clone();
        }
        let pending = vec![None; program.regions.len()];
        CompiledMachine {
            program,
            frame,
            pc: 0,
            suspended_at: None,
            pending_bind: None,
            pending,
            point: 0,
        }
    }

    /// The program being run
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Current value of the most recently declared local with this name
    pub fn local(&self, name: &str) -> Option<&Value> {
        let index = self.program.slot_names.iter().rposition(|n| n == name)?;
        self.frame.get(index)
    }

    fn store(&mut self, slot: Slot, value: Value) {
        if let Some(target) = self.frame.get_mut(slot.index()) {
            *target = value;
        }
    }

    fn frame_error(&self, error: JsError, pc: usize) -> Thrown {
        let error = error
            .with_position(SourcePosition::at_op(pc))
            .with_frame(StackFrame::in_function(&self.program.name, pc));
        Thrown::from(error)
    }

    fn eval(&self, operand: &Operand, pc: usize) -> Result<Value, Thrown> {
        match operand {
            Operand::Const(value) => Ok(value.clone()),
            Operand::Load(slot) => Ok(self.frame.get(slot.index()).cloned().unwrap_or(Value::Undefined)),
            Operand::Binary(op, lhs, rhs) => {
                let a = self.eval(lhs, pc)?;
                let b = self.eval(rhs, pc)?;
                operators::binary(*op, a, b).map_err(|e| self.frame_error(e, pc))
            }
            Operand::Not(inner) => Ok(operators::not(&self.eval(inner, pc)?)),
            Operand::Array(items) => Ok(Value::array(self.eval_all(items, pc)?)),
            Operand::Call(func, args) => {
                let args = self.eval_all(args, pc)?;
                func.call(&args).map_err(|e| {
                    let e = e.with_frame(StackFrame::in_function(&func.name, 0));
                    self.frame_error(e, pc)
                })
            }
            Operand::Spawn(func, args) => {
                let args = self.eval_all(args, pc)?;
                Ok(iterable_value(func.instantiate(&args)))
            }
        }
    }

    fn eval_all(&self, operands: &[Operand], pc: usize) -> Result<Vec<Value>, Thrown> {
        operands.iter().map(|o| self.eval(o, pc)).collect()
    }

    fn suspend(&mut self, pc: usize, point: usize, bind: Option<Slot>) {
        self.suspended_at = Some(pc);
        self.point = point;
        self.pending_bind = bind;
        self.pc = pc + 1;
        for (value, lifted) in self.frame.iter_mut().zip(&self.program.lifted) {
            if !lifted {
                *value = Value::Undefined;
            }
        }
        trace!(generator = %self.program.name, point, "suspending");
    }

    fn exec(&mut self, op: &Op, pc: usize) -> Result<Control, Thrown> {
        Ok(match op {
            Op::Assign(slot, value) => {
                let value = self.eval(value, pc)?;
                self.store(*slot, value);
                Control::Goto(pc + 1)
            }
            Op::Eval(value) => {
                self.eval(value, pc)?;
                Control::Goto(pc + 1)
            }
            Op::Yield { point, value, bind } => {
                let value = self.eval(value, pc)?;
                self.suspend(pc, *point, *bind);
                Control::Suspend(Step::Yield(value))
            }
            Op::Delegate {
                point,
                source,
                bind,
            } => {
                let iterable = self.eval(source, pc)?;
                let iterator = get_iterator(&iterable).map_err(|e| match e {
                    GeneratorError::Injected(value) => Thrown::injected(value),
                    other => Thrown::step(other.thrown_value().unwrap_or(Value::Undefined)),
                })?;
                self.suspend(pc, *point, *bind);
                Control::Suspend(Step::Delegate(iterator))
            }
            Op::Jump(target) => Control::Goto(*target),
            Op::JumpUnless(test, target) => {
                if self.eval(test, pc)?.is_truthy() {
                    Control::Goto(pc + 1)
                } else {
                    Control::Goto(*target)
                }
            }
            Op::Return(value) => Control::Abrupt(Completion::Return(self.eval(value, pc)?)),
            Op::Throw(value) => Control::Abrupt(Completion::Throw(Thrown::step(self.eval(value, pc)?))),
            Op::EndFinally(region) => match self.pending.get_mut(*region).and_then(Option::take) {
                Some(completion) => Control::Abrupt(completion),
                None => Control::Goto(pc + 1),
            },
        })
    }

    /// Run from `self.pc` to the next suspension or completion
    fn run(&mut self) -> GeneratorResult<Step> {
        let program = Rc::clone(&self.program);
        loop {
            let pc = self.pc;
            let Some(op) = program.ops.get(pc) else {
                return Ok(Step::Return(Value::Undefined));
            };
            let completion = match self.exec(op, pc) {
                Ok(Control::Goto(next)) => {
                    self.pc = next;
                    continue;
                }
                Ok(Control::Suspend(step)) => return Ok(step),
                Ok(Control::Abrupt(completion)) => completion,
                Err(thrown) => Completion::Throw(thrown),
            };
            if let Flow::Complete(value) = self.unwind(completion, pc)? {
                return Ok(Step::Return(value));
            }
        }
    }

    /// Route an abrupt completion raised at `pc` to the innermost handler
    fn unwind(&mut self, completion: Completion, pc: usize) -> GeneratorResult<Flow> {
        let program = Rc::clone(&self.program);
        for region in program.enclosing_regions(pc) {
            if region.finalizer.as_ref().is_some_and(|f| f.contains(&pc)) {
                // an abrupt exit from finally replaces whatever entered it
                self.pending[region.id] = None;
                continue;
            }

            let in_body = region.body.contains(&pc);
            if in_body {
                if let (Completion::Throw(thrown), Some(handler)) = (&completion, &region.handler) {
                    if let Some(slot) = handler.slot {
                        self.store(slot, thrown.value.clone());
                    }
                    trace!(generator = %program.name, region = region.id, "entering catch");
                    self.pc = handler.range.start;
                    return Ok(Flow::Continue);
                }
            }

            let in_handler = region
                .handler
                .as_ref()
                .is_some_and(|h| h.range.contains(&pc));
            if in_body || in_handler {
                if let Some(finalizer) = &region.finalizer {
                    trace!(generator = %program.name, region = region.id, "entering finally");
                    self.pending[region.id] = Some(completion);
                    self.pc = finalizer.start;
                    return Ok(Flow::Continue);
                }
            }
        }

        match completion {
            Completion::Return(value) => Ok(Flow::Complete(value)),
            Completion::Throw(thrown) => Err(thrown.into_error()),
        }
    }

    fn resume_abrupt(&mut self, completion: Completion) -> GeneratorResult<Step> {
        self.pending_bind = None;
        let Some(at) = self.suspended_at else {
            return match completion {
                Completion::Return(value) => Ok(Step::Return(value)),
                Completion::Throw(thrown) => Err(thrown.into_error()),
            };
        };
        match self.unwind(completion, at)? {
            Flow::Continue => self.run(),
            Flow::Complete(value) => Ok(Step::Return(value)),
        }
    }
}

impl StateMachine for CompiledMachine {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        trace!(generator = %self.program.name, point = self.point, "resuming");
        match input {
            Resume::Next(value) => {
                if let Some(slot) = self.pending_bind.take() {
                    self.store(slot, value);
                }
                self.run()
            }
            Resume::Throw(thrown) => self.resume_abrupt(Completion::Throw(thrown)),
            Resume::Return(value) => self.resume_abrupt(Completion::Return(value)),
        }
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}
