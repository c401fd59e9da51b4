//! End-to-end tests: generator declarations compiled and driven through the
//! public iteration surface.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use core_types::{ErrorKind, Value};
use generator_compiler::{CatchClause, Expr, GeneratorDecl, GeneratorFunction, HostFunction, Rhs, Stmt};
use iteration::{for_of, GeneratorError, GeneratorState, IteratorResult, JsIterator};

/// Host function that appends its arguments to a shared log
fn recorder() -> (HostFunction, Rc<RefCell<Vec<Value>>>) {
    let log = Rc::new(RefCell::new(vec![]));
    let sink = Rc::clone(&log);
    let func = HostFunction::new("log", move |args| {
        sink.borrow_mut().extend(args.iter().cloned());
        Ok(Value::Undefined)
    });
    (func, log)
}

fn compile(name: &str, params: &[&str], body: Vec<Stmt>) -> GeneratorFunction {
    GeneratorFunction::compile(&GeneratorDecl::new(name, params, body)).expect("compile failed")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_counter_yields_one_two_three() {
    // function* counter() { let i = 1; while (i < 4) { yield i; i = i + 1; } }
    let counter = compile(
        "counter",
        &[],
        vec![
            Stmt::let_("i", Expr::int(1)),
            Stmt::While {
                test: Expr::lt(Expr::local("i"), Expr::int(4)),
                body: vec![
                    Stmt::yield_(Expr::local("i")),
                    Stmt::assign("i", Expr::add(Expr::local("i"), Expr::int(1))),
                ],
            },
        ],
    );
    let g = counter.instantiate(&[]);
    let results: Vec<IteratorResult> = (0..4).map(|_| g.next(Value::Undefined).unwrap()).collect();
    assert_eq!(
        results,
        vec![
            IteratorResult::value(Value::Smi(1)),
            IteratorResult::value(Value::Smi(2)),
            IteratorResult::value(Value::Smi(3)),
            IteratorResult::done(),
        ]
    );
    // the loop counter lives across a suspension
    assert!(counter.program().is_lifted("i"));
}

#[test]
fn test_sent_value_reaches_logger() {
    let (log, seen) = recorder();
    let logger = compile(
        "logger",
        &[],
        vec![
            Stmt::let_("x", Rhs::Yield(Expr::int(10))),
            Stmt::expr(Expr::call(&log, vec![Expr::local("x")])),
        ],
    );
    let g = logger.instantiate(&[]);
    assert_eq!(g.next(Value::Undefined).unwrap(), IteratorResult::value(Value::Smi(10)));
    assert_eq!(g.next(Value::string("hello")).unwrap(), IteratorResult::done());
    assert_eq!(*seen.borrow(), vec![Value::string("hello")]);
}

#[test]
fn test_running_total_accumulates_sent_values() {
    // function* total() { let sum = 0; while (true) { sum = sum + (yield sum); } }
    let total = compile(
        "total",
        &[],
        vec![
            Stmt::let_("sum", Expr::int(0)),
            Stmt::While {
                test: Expr::Const(Value::Boolean(true)),
                body: vec![
                    Stmt::let_("n", Rhs::Yield(Expr::local("sum"))),
                    Stmt::assign("sum", Expr::add(Expr::local("sum"), Expr::local("n"))),
                ],
            },
        ],
    );
    let g = total.instantiate(&[]);
    assert_eq!(g.next(Value::Undefined).unwrap().value, Value::Smi(0));
    assert_eq!(g.next(Value::Smi(5)).unwrap().value, Value::Smi(5));
    assert_eq!(g.next(Value::Smi(7)).unwrap().value, Value::Smi(12));
    assert_eq!(g.return_value(Value::string("stop")).unwrap(), IteratorResult::done_with_value(Value::string("stop")));
}

#[test]
fn test_resource_cleanup_on_early_break() {
    let (log, seen) = recorder();
    let resource = compile(
        "resource",
        &[],
        vec![Stmt::Try {
            block: vec![
                Stmt::yield_(Expr::str("a")),
                Stmt::yield_(Expr::str("b")),
                Stmt::yield_(Expr::str("c")),
            ],
            handler: None,
            finalizer: Some(vec![Stmt::expr(Expr::call(&log, vec![Expr::str("closed")]))]),
        }],
    );
    let mut taken = vec![];
    for_of(&resource, |v| {
        taken.push(v);
        if taken.len() == 2 {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    })
    .unwrap();
    assert_eq!(taken, vec![Value::string("a"), Value::string("b")]);
    assert_eq!(*seen.borrow(), vec![Value::string("closed")]);
}

#[test]
fn test_throw_recovers_in_catch_and_continues() {
    // function* retry() { while (true) { try { yield "ready"; } catch (e) { yield e; } } }
    let retry = compile(
        "retry",
        &[],
        vec![Stmt::While {
            test: Expr::Const(Value::Boolean(true)),
            body: vec![Stmt::Try {
                block: vec![Stmt::yield_(Expr::str("ready"))],
                handler: Some(CatchClause {
                    param: Some("e".to_string()),
                    body: vec![Stmt::yield_(Expr::local("e"))],
                }),
                finalizer: None,
            }],
        }],
    );
    let g = retry.instantiate(&[]);
    assert_eq!(g.next(Value::Undefined).unwrap().value, Value::string("ready"));
    assert_eq!(g.throw(Value::Smi(1)).unwrap().value, Value::Smi(1));
    assert_eq!(g.next(Value::Undefined).unwrap().value, Value::string("ready"));
    assert_eq!(g.throw(Value::Smi(2)).unwrap().value, Value::Smi(2));
    assert!(matches!(g.state(), GeneratorState::SuspendedAtStep(_)));
}

#[test]
fn test_unhandled_throw_before_start_completes() {
    let g = compile("idle", &[], vec![Stmt::yield_(Expr::int(1))]).instantiate(&[]);
    let err = g.throw(Value::string("early")).unwrap_err();
    assert_eq!(err, GeneratorError::Injected(Value::string("early")));
    assert_eq!(g.state(), GeneratorState::Completed);
    assert_eq!(g.next(Value::Undefined).unwrap(), IteratorResult::done());
}

#[test]
fn test_runtime_type_error_propagates_as_step_failure() {
    // function* bad() { yield 1n + 1; }
    let bad = compile(
        "bad",
        &[],
        vec![Stmt::yield_(Expr::add(
            Expr::Const(Value::BigInt(1.into())),
            Expr::int(1),
        ))],
    );
    let g = bad.instantiate(&[]);
    let err = g.next(Value::Undefined).unwrap_err();
    let thrown = err.thrown_value().unwrap();
    assert_eq!(thrown.as_error().unwrap().kind, ErrorKind::TypeError);
    assert!(!err.is_injected());
    assert!(g.is_done());
}

#[test]
fn test_generator_value_is_iterable_as_value() {
    let pair = compile("pair", &[], vec![Stmt::yield_(Expr::int(1)), Stmt::yield_(Expr::int(2))]);
    let value = pair.call(&[]);
    let mut iter = iteration::get_iterator(&value).unwrap();
    assert_eq!(iter.next(Value::Undefined).unwrap().value, Value::Smi(1));
    assert_eq!(iter.next(Value::Undefined).unwrap().value, Value::Smi(2));
    assert!(iter.next(Value::Undefined).unwrap().done);
}

// ============================================================================
// Compile-time errors
// ============================================================================

#[test]
fn test_unknown_name_is_reference_error() {
    let err = GeneratorFunction::compile(&GeneratorDecl::new(
        "broken",
        &[],
        vec![Stmt::yield_(Expr::local("missing"))],
    ))
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);
    assert_eq!(err.message, "missing is not defined");
}

#[test]
fn test_yield_in_finally_is_syntax_error() {
    let err = GeneratorFunction::compile(&GeneratorDecl::new(
        "broken",
        &[],
        vec![Stmt::Try {
            block: vec![],
            handler: None,
            finalizer: Some(vec![Stmt::yield_(Expr::int(1))]),
        }],
    ))
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

#[test]
fn test_redeclaration_is_syntax_error() {
    let err = GeneratorFunction::compile(&GeneratorDecl::new(
        "broken",
        &[],
        vec![Stmt::let_("x", Expr::int(1)), Stmt::let_("x", Expr::int(2))],
    ))
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}
