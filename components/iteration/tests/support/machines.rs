//! Hand-written state machines shared by the iteration test suites.
//!
//! Each machine documents the generator body it stands for.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use core_types::{JsError, Value};
use iteration::{
    BoxedIterator, Generator, GeneratorResult, IteratorResult, JsIterator, Resume, RuntimeConfig,
    StateMachine, Step,
};

/// `function* (items) { for (const x of items) yield x; }`
pub struct Values {
    items: Vec<Value>,
    point: usize,
}

impl StateMachine for Values {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        if let Err(abrupt) = input.sent() {
            return abrupt.complete();
        }
        let next = self.items.get(self.point).cloned();
        self.point += 1;
        Ok(match next {
            Some(v) => Step::Yield(v),
            None => Step::Return(Value::Undefined),
        })
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}

pub fn values(items: Vec<Value>) -> Generator<Values> {
    Generator::new(Values { items, point: 0 })
}

pub fn one_two_three() -> Generator<Values> {
    values(vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)])
}

/// ```text
/// function* () {
///     const x = yield 10;
///     log.push(x);
///     return x;
/// }
/// ```
pub struct Logger {
    point: usize,
    pub log: Rc<RefCell<Vec<Value>>>,
}

impl StateMachine for Logger {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        let sent = match input.sent() {
            Ok(v) => v,
            Err(abrupt) => return abrupt.complete(),
        };
        self.point += 1;
        match self.point {
            1 => Ok(Step::Yield(Value::Smi(10))),
            _ => {
                self.log.borrow_mut().push(sent.clone());
                Ok(Step::Return(sent))
            }
        }
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}

pub fn logger() -> (Generator<Logger>, Rc<RefCell<Vec<Value>>>) {
    let log = Rc::new(RefCell::new(vec![]));
    let machine = Logger {
        point: 0,
        log: Rc::clone(&log),
    };
    (Generator::new(machine), log)
}

/// ```text
/// function* () {
///     try { yield 1; yield 2; }
///     finally { cleanups++; }
/// }
/// ```
pub struct Guarded {
    point: usize,
    cleanups: Rc<Cell<u32>>,
}

impl Guarded {
    fn cleanup(&mut self) {
        self.cleanups.set(self.cleanups.get() + 1);
        self.point = 3;
    }
}

impl StateMachine for Guarded {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        match (self.point, input) {
            (0, _) => {
                self.point = 1;
                Ok(Step::Yield(Value::Smi(1)))
            }
            (1, Resume::Next(_)) => {
                self.point = 2;
                Ok(Step::Yield(Value::Smi(2)))
            }
            (2, Resume::Next(_)) => {
                self.cleanup();
                Ok(Step::Return(Value::Undefined))
            }
            (_, Resume::Return(v)) => {
                self.cleanup();
                Ok(Step::Return(v))
            }
            (_, Resume::Throw(thrown)) => {
                self.cleanup();
                Err(thrown.into_error())
            }
            (_, Resume::Next(_)) => Ok(Step::Return(Value::Undefined)),
        }
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}

pub fn guarded() -> (Generator<Guarded>, Rc<Cell<u32>>) {
    let cleanups = Rc::new(Cell::new(0));
    let machine = Guarded {
        point: 0,
        cleanups: Rc::clone(&cleanups),
    };
    (Generator::new(machine), cleanups)
}

/// ```text
/// function* () {
///     try { yield 1; }
///     catch (e) { yield e; }
///     return "after";
/// }
/// ```
pub struct Catcher {
    point: usize,
}

impl StateMachine for Catcher {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        match (self.point, input) {
            (0, _) => {
                self.point = 1;
                Ok(Step::Yield(Value::Smi(1)))
            }
            (1, Resume::Throw(thrown)) => {
                self.point = 2;
                Ok(Step::Yield(thrown.value))
            }
            (_, input) => match input.sent() {
                Ok(_) => {
                    self.point = 3;
                    Ok(Step::Return(Value::string("after")))
                }
                Err(abrupt) => abrupt.complete(),
            },
        }
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}

pub fn catcher() -> Generator<Catcher> {
    Generator::new(Catcher { point: 0 })
}

/// ```text
/// function* () {
///     const r = yield* inner;
///     return r;
/// }
/// ```
pub struct Delegator {
    inner: Option<BoxedIterator>,
    point: usize,
}

impl StateMachine for Delegator {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        let sent = match input.sent() {
            Ok(v) => v,
            Err(abrupt) => return abrupt.complete(),
        };
        self.point += 1;
        match self.inner.take() {
            Some(inner) => Ok(Step::Delegate(inner)),
            None => Ok(Step::Return(sent)),
        }
    }

    fn suspend_point(&self) -> usize {
        self.point
    }
}

pub fn delegator(inner: BoxedIterator) -> Generator<Delegator> {
    delegator_with_config(inner, RuntimeConfig::default())
}

pub fn delegator_with_config(inner: BoxedIterator, config: RuntimeConfig) -> Generator<Delegator> {
    Generator::with_config(
        Delegator {
            inner: Some(inner),
            point: 0,
        },
        config,
    )
}

/// `function* () { yield 1; yield 2; return "inner-done"; }`
pub fn inner_with_result() -> BoxedIterator {
    struct Inner {
        point: usize,
    }

    impl StateMachine for Inner {
        fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
            if let Err(abrupt) = input.sent() {
                return abrupt.complete();
            }
            self.point += 1;
            Ok(match self.point {
                1 => Step::Yield(Value::Smi(1)),
                2 => Step::Yield(Value::Smi(2)),
                _ => Step::Return(Value::string("inner-done")),
            })
        }

        fn suspend_point(&self) -> usize {
            self.point
        }
    }

    Box::new(Generator::new(Inner { point: 0 }))
}

/// `function* f() { yield* f(); }`
pub struct Bottomless {
    config: RuntimeConfig,
}

impl StateMachine for Bottomless {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        if let Err(abrupt) = input.sent() {
            return abrupt.complete();
        }
        let nested = Generator::with_config(
            Bottomless {
                config: self.config.clone(),
            },
            self.config.clone(),
        );
        Ok(Step::Delegate(Box::new(nested)))
    }

    fn suspend_point(&self) -> usize {
        1
    }
}

pub fn bottomless(config: RuntimeConfig) -> Generator<Bottomless> {
    Generator::with_config(
        Bottomless {
            config: config.clone(),
        },
        config,
    )
}

/// A generator whose body calls `next` on itself
pub struct Reentrant {
    this: Rc<RefCell<Option<Generator<Reentrant>>>>,
}

impl StateMachine for Reentrant {
    fn resume(&mut self, input: Resume) -> GeneratorResult<Step> {
        if let Err(abrupt) = input.sent() {
            return abrupt.complete();
        }
        let this = self.this.borrow().clone();
        match this {
            Some(generator) => match generator.next(Value::Undefined) {
                Err(error) => Ok(Step::Yield(error.thrown_value().unwrap_or(Value::Undefined))),
                Ok(_) => Err(JsError::type_error("re-entry was allowed").into()),
            },
            None => Ok(Step::Return(Value::Undefined)),
        }
    }

    fn suspend_point(&self) -> usize {
        1
    }
}

pub fn reentrant() -> Generator<Reentrant> {
    let slot = Rc::new(RefCell::new(None));
    let generator = Generator::new(Reentrant {
        this: Rc::clone(&slot),
    });
    *slot.borrow_mut() = Some(generator.clone());
    generator
}

/// Iterator whose `return` keeps producing values
pub struct Stubborn;

impl JsIterator for Stubborn {
    fn next(&mut self, _resume: Value) -> GeneratorResult<IteratorResult> {
        Ok(IteratorResult::value(Value::string("more")))
    }

    fn return_value(&mut self, _value: Value) -> Option<GeneratorResult<IteratorResult>> {
        Some(Ok(IteratorResult::value(Value::string("still here"))))
    }
}

/// Iterator with `return` but no `throw`, recording closes
pub struct NoThrow {
    pub closes: Rc<Cell<u32>>,
}

impl JsIterator for NoThrow {
    fn next(&mut self, _resume: Value) -> GeneratorResult<IteratorResult> {
        Ok(IteratorResult::value(Value::Smi(0)))
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        self.closes.set(self.closes.get() + 1);
        Some(Ok(IteratorResult::done_with_value(value)))
    }
}
