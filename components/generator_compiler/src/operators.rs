//! Binary and unary operator semantics

use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Zero;

use core_types::{JsError, Value};

use crate::ast::BinaryOp;

fn mixed_bigint() -> JsError {
    JsError::type_error("Cannot mix BigInt and other types, use explicit conversions")
}

/// Apply a binary operator
pub fn binary(op: BinaryOp, a: Value, b: Value) -> Result<Value, JsError> {
    match op {
        BinaryOp::Add => add(a, b),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => arithmetic(op, a, b),
        BinaryOp::Lt => compare(a, b, |o| o.is_lt()),
        BinaryOp::Le => compare(a, b, |o| o.is_le()),
        BinaryOp::Gt => compare(a, b, |o| o.is_gt()),
        BinaryOp::Ge => compare(a, b, |o| o.is_ge()),
        BinaryOp::StrictEq => Ok(Value::Boolean(strict_equal(&a, &b))),
        BinaryOp::StrictNe => Ok(Value::Boolean(!strict_equal(&a, &b))),
    }
}

/// `!value`
pub fn not(value: &Value) -> Value {
    Value::Boolean(!value.is_truthy())
}

fn add(a: Value, b: Value) -> Result<Value, JsError> {
    match (&a, &b) {
        // String concatenation has priority
        (Value::String(x), _) => Ok(Value::String(format!("{}{}", x, b))),
        (_, Value::String(y)) => Ok(Value::String(format!("{}{}", a, y))),
        (Value::Smi(x), Value::Smi(y)) => Ok(x
            .checked_add(*y)
            .map(Value::Smi)
            .unwrap_or_else(|| Value::Double(*x as f64 + *y as f64))),
        (Value::BigInt(x), Value::BigInt(y)) => Ok(Value::BigInt(x + y)),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(mixed_bigint()),
        _ => Ok(Value::number(a.to_number() + b.to_number())),
    }
}

fn arithmetic(op: BinaryOp, a: Value, b: Value) -> Result<Value, JsError> {
    match (&a, &b) {
        (Value::BigInt(x), Value::BigInt(y)) => bigint_arithmetic(op, x, y),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(mixed_bigint()),
        (Value::Smi(x), Value::Smi(y)) if op != BinaryOp::Div => {
            let exact = match op {
                BinaryOp::Sub => x.checked_sub(*y),
                BinaryOp::Mul => x.checked_mul(*y),
                _ => None,
            };
            match exact {
                Some(n) => Ok(Value::Smi(n)),
                None => Ok(Value::number(float_arithmetic(op, *x as f64, *y as f64))),
            }
        }
        _ => Ok(Value::number(float_arithmetic(op, a.to_number(), b.to_number()))),
    }
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> f64 {
    match op {
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        BinaryOp::Mod => x % y,
        _ => f64::NAN,
    }
}

fn bigint_arithmetic(op: BinaryOp, x: &BigInt, y: &BigInt) -> Result<Value, JsError> {
    if matches!(op, BinaryOp::Div | BinaryOp::Mod) && y.is_zero() {
        return Err(JsError::range_error("Division by zero"));
    }
    Ok(Value::BigInt(match op {
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        _ => x % y,
    }))
}

fn compare(
    a: Value,
    b: Value,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, JsError> {
    let ordering = match (&a, &b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::BigInt(x), Value::BigInt(y)) => Some(x.cmp(y)),
        _ => a.to_number().partial_cmp(&b.to_number()),
    };
    // NaN compares false both ways
    Ok(Value::Boolean(ordering.map(test).unwrap_or(false)))
}

fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Double(x), _) | (_, Value::Double(x)) if x.is_nan() => false,
        // objects compare by identity
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Error(x), Value::Error(y)) => Rc::ptr_eq(x, y),
        _ => a == b,
    }
}
