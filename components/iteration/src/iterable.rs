//! Iterables: values that can produce an iterator, and the `for...of` loop
//! that drives them.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use core_types::{JsError, Value};
use tracing::debug;

use crate::builtin::{ArrayIterator, StringIterator};
use crate::error::{GeneratorError, GeneratorResult};
use crate::protocol::{BoxedIterator, JsIterator};
use crate::result::IteratorResult;

/// Anything with an iterator factory (`[Symbol.iterator]`)
pub trait Iterable {
    /// Produce an iterator for one traversal
    fn make_iterator(&self) -> GeneratorResult<BoxedIterator>;
}

/// Iterator behind a shared handle; its factory returns itself.
///
/// Every clone observes the same position, so an iterator that has been
/// partly consumed stays partly consumed when traversed through any view.
pub struct SharedIterator<I> {
    inner: Rc<RefCell<I>>,
}

impl<I> Clone for SharedIterator<I> {
    fn clone(&self) -> Self {
        SharedIterator {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: JsIterator> SharedIterator<I> {
    /// Share an iterator
    pub fn new(iterator: I) -> Self {
        SharedIterator {
            inner: Rc::new(RefCell::new(iterator)),
        }
    }

    /// Whether both handles view the same iterator
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn with<R>(&self, f: impl FnOnce(&mut I) -> R) -> GeneratorResult<R> {
        let mut inner = self
            .inner
            .try_borrow_mut()
            .map_err(|_| GeneratorError::AlreadyRunning)?;
        Ok(f(&mut inner))
    }
}

impl<I: JsIterator> JsIterator for SharedIterator<I> {
    fn next(&mut self, resume: Value) -> GeneratorResult<IteratorResult> {
        self.with(|it| it.next(resume))?
    }

    fn return_value(&mut self, value: Value) -> Option<GeneratorResult<IteratorResult>> {
        match self.with(|it| it.return_value(value)) {
            Ok(result) => result,
            Err(e) => Some(Err(e)),
        }
    }

    fn throw(&mut self, error: Value) -> Option<GeneratorResult<IteratorResult>> {
        match self.with(|it| it.throw(error)) {
            Ok(result) => result,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<I: JsIterator + 'static> Iterable for SharedIterator<I> {
    fn make_iterator(&self) -> GeneratorResult<BoxedIterator> {
        Ok(Box::new(self.clone()))
    }
}

/// Host iterable stored inside a [`Value::NativeObject`]
#[derive(Clone)]
pub struct IterableObject {
    iterable: Rc<dyn Iterable>,
}

impl IterableObject {
    /// Wrap an iterable
    pub fn new(iterable: impl Iterable + 'static) -> Self {
        IterableObject {
            iterable: Rc::new(iterable),
        }
    }
}

impl Iterable for IterableObject {
    fn make_iterator(&self) -> GeneratorResult<BoxedIterator> {
        self.iterable.make_iterator()
    }
}

/// Expose an iterable as a value
pub fn iterable_value(iterable: impl Iterable + 'static) -> Value {
    Value::native(IterableObject::new(iterable))
}

/// GetIterator(value): arrays, strings and host iterables
pub fn get_iterator(value: &Value) -> GeneratorResult<BoxedIterator> {
    match value {
        Value::Array(_) => Ok(Box::new(ArrayIterator::new(value.clone()))),
        Value::String(s) => Ok(Box::new(StringIterator::new(s.clone()))),
        Value::NativeObject(object) => {
            let iterable = object
                .try_borrow()
                .ok()
                .and_then(|o| o.downcast_ref::<IterableObject>().cloned());
            match iterable {
                Some(iterable) => iterable.make_iterator(),
                None => Err(not_iterable(value)),
            }
        }
        _ => Err(not_iterable(value)),
    }
}

fn not_iterable(value: &Value) -> GeneratorError {
    GeneratorError::step(JsError::type_error(format!(
        "{} is not iterable",
        value.type_of()
    )))
}

/// Close an iterator on early exit
pub(crate) fn close(iterator: &mut dyn JsIterator) -> GeneratorResult<()> {
    debug!("closing iterator early");
    match iterator.return_value(Value::Undefined) {
        Some(Err(e)) => Err(e),
        _ => Ok(()),
    }
}

/// Drive an already-created iterator like a `for...of` loop.
///
/// Returns the value carried by the final `done` result, or undefined when
/// the body broke out. Breaking or failing closes the iterator; a failure
/// from the body wins over a failure while closing.
pub fn drive<F>(iterator: &mut dyn JsIterator, mut body: F) -> GeneratorResult<Value>
where
    F: FnMut(Value) -> GeneratorResult<ControlFlow<()>>,
{
    loop {
        let result = iterator.next(Value::Undefined)?;
        if result.done {
            return Ok(result.value);
        }
        match body(result.value) {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => {
                close(iterator)?;
                return Ok(Value::Undefined);
            }
            Err(e) => {
                let _ = close(iterator);
                return Err(e);
            }
        }
    }
}

/// `for (x of iterable) body(x)`: calls the factory exactly once
pub fn for_of<F>(iterable: &dyn Iterable, body: F) -> GeneratorResult<Value>
where
    F: FnMut(Value) -> GeneratorResult<ControlFlow<()>>,
{
    let mut iterator = iterable.make_iterator()?;
    drive(iterator.as_mut(), body)
}

/// `for...of` over a value resolved with [`get_iterator`]
pub fn for_of_value<F>(value: &Value, body: F) -> GeneratorResult<Value>
where
    F: FnMut(Value) -> GeneratorResult<ControlFlow<()>>,
{
    let mut iterator = get_iterator(value)?;
    drive(iterator.as_mut(), body)
}
