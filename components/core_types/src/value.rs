//! JavaScript value representation.
//!
//! This module provides the core `Value` enum that represents every value a
//! generator can yield, receive, return or throw.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::JsError;

/// A JavaScript value as seen by generators and iterators.
///
/// Primitive values are stored inline. Arrays are immutable shared lists,
/// thrown host errors travel as [`Value::Error`], and host objects (iterables,
/// generator handles) are carried as type-erased native objects.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// // numbers normalize to the small-integer form when they can
/// assert_eq!(Value::number(3.0), Value::Smi(3));
/// assert!(Value::number(0.5).is_number());
///
/// let items = Value::array(vec![Value::from("a"), Value::from(true)]);
/// assert_eq!(items.type_of(), "object");
/// ```
#[derive(Clone)]
pub enum Value {
    /// JavaScript undefined value
    Undefined,
    /// JavaScript null value
    Null,
    /// JavaScript boolean (true or false)
    Boolean(bool),
    /// Small integer (fits in 32 bits)
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// JavaScript string value
    String(std::string::String),
    /// JavaScript BigInt (arbitrary precision integer)
    BigInt(BigInt),
    /// Immutable array of values
    Array(Rc<Vec<Value>>),
    /// Error object produced by the runtime or a host function
    Error(Rc<JsError>),
    /// Native object (iterables, generator handles, ...)
    NativeObject(Rc<RefCell<dyn Any>>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Value::NativeObject(_) => write!(f, "NativeObject(...)"),
        }
    }
}

/// Structural equality: arrays by contents, errors by kind and message,
/// native objects by identity. `===` on objects is an identity test and is
/// not this.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Smi(a), Value::Double(b)) | (Value::Double(b), Value::Smi(a)) => {
                f64::from(*a) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a.kind == b.kind && a.message == b.message,
            (Value::NativeObject(a), Value::NativeObject(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Create a number value, using the small-integer form when it fits.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert_eq!(Value::number(2.0), Value::Smi(2));
    /// assert!(matches!(Value::number(2.5), Value::Double(_)));
    /// ```
    pub fn number(n: f64) -> Self {
        if n.fract() == 0.0
            && n >= f64::from(i32::MIN)
            && n <= f64::from(i32::MAX)
            && !(n == 0.0 && n.is_sign_negative())
        {
            Value::Smi(n as i32)
        } else {
            Value::Double(n)
        }
    }

    /// Create a string value
    pub fn string(s: impl Into<std::string::String>) -> Self {
        Value::String(s.into())
    }

    /// Create an array value from its elements
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    /// Wrap any host object as a native object value
    pub fn native<T: Any>(object: T) -> Self {
        Value::NativeObject(Rc::new(RefCell::new(object)))
    }

    /// ToBoolean: what a compiled `if`/`while` test or `!` sees.
    ///
    /// Falsy: `undefined`, `null`, `false`, `0`, `-0`, `NaN`, `""` and `0n`.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(!Value::string("").is_truthy());
    /// assert!(Value::array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::BigInt(n) => !n.is_zero(),
            Value::Array(_) | Value::Error(_) | Value::NativeObject(_) => true,
        }
    }

    /// Returns true for `undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true for either number representation
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Smi(_) | Value::Double(_))
    }

    /// Numeric view of a number value, `None` for everything else
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Smi(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The error carried by an error value
    pub fn as_error(&self) -> Option<&JsError> {
        match self {
            Value::Error(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// ToNumber conversion (simplified).
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert_eq!(Value::Boolean(true).to_number(), 1.0);
    /// assert_eq!(Value::string(" 12 ").to_number(), 12.0);
    /// assert!(Value::Undefined.to_number().is_nan());
    /// ```
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Smi(n) => f64::from(*n),
            Value::Double(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::BigInt(n) => n.to_f64().unwrap_or(f64::NAN),
            Value::Array(items) if items.is_empty() => 0.0,
            Value::Array(items) if items.len() == 1 => items[0].to_number(),
            Value::Array(_) | Value::Error(_) | Value::NativeObject(_) => f64::NAN,
        }
    }

    /// `typeof` name, used in "x is not iterable" messages.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::Double(0.5).type_of(), "number");
    /// ```
    pub fn type_of(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "object".to_string(),
            Value::Boolean(_) => "boolean".to_string(),
            Value::Smi(_) | Value::Double(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::BigInt(_) => "bigint".to_string(),
            Value::Array(_) | Value::Error(_) | Value::NativeObject(_) => "object".to_string(),
        }
    }
}

impl From<JsError> for Value {
    fn from(error: JsError) -> Self {
        Value::Error(Rc::new(error))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// String conversion as `String(value)` would do it. Arrays join their
/// elements with `,` and errors print as `Kind: message`.
///
/// ```
/// use core_types::Value;
///
/// assert_eq!(Value::Double(2.0).to_string(), "2");
/// assert_eq!(Value::array(vec![Value::Smi(1), Value::Null]).to_string(), "1,");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integer-valued doubles display without decimal point
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match item {
                        Value::Undefined | Value::Null => {}
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
            Value::Error(e) => write!(f, "{}", e),
            Value::NativeObject(_) => write!(f, "[object Object]"),
        }
    }
}
