//! Unit tests for Value enum

use core_types::{JsError, Value};
use num_bigint::BigInt;

#[cfg(test)]
mod value_creation_tests {
    use super::*;

    #[test]
    fn test_value_number_smi_range() {
        assert!(matches!(Value::number(0.0), Value::Smi(0)));
        assert!(matches!(Value::number(-100.0), Value::Smi(-100)));
        assert!(matches!(Value::number(f64::from(i32::MAX)), Value::Smi(i32::MAX)));
    }

    #[test]
    fn test_value_number_double_range() {
        assert!(matches!(Value::number(3.14), Value::Double(_)));
        assert!(matches!(Value::number(f64::INFINITY), Value::Double(_)));
        assert!(matches!(Value::number(f64::from(i32::MAX) + 1.0), Value::Double(_)));
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(5), Value::Smi(5));
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from("foo"), Value::string("foo"));
    }

    #[test]
    fn test_value_array_shares_storage() {
        let arr = Value::array(vec![Value::Smi(1), Value::Smi(2)]);
        let copy = arr.clone();
        if let (Value::Array(a), Value::Array(b)) = (&arr, &copy) {
            assert!(std::rc::Rc::ptr_eq(a, b));
        } else {
            panic!("expected arrays");
        }
    }
}

#[cfg(test)]
mod value_is_truthy_tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Smi(0).is_truthy());
        assert!(!Value::Double(-0.0).is_truthy());
        assert!(!Value::Double(f64::NAN).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(!Value::BigInt(BigInt::from(0)).is_truthy());
    }

    #[test]
    fn test_truthy_values() {
        assert!(Value::Smi(-1).is_truthy());
        assert!(Value::Double(0.1).is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::from(JsError::type_error("e")).is_truthy());
        assert!(Value::native(()).is_truthy());
    }
}

#[cfg(test)]
mod value_to_number_tests {
    use super::*;

    #[test]
    fn test_primitive_conversions() {
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Boolean(false).to_number(), 0.0);
        assert_eq!(Value::Smi(9).to_number(), 9.0);
        assert_eq!(Value::string("2.5").to_number(), 2.5);
        assert!(Value::string("abc").to_number().is_nan());
    }

    #[test]
    fn test_array_conversions() {
        assert_eq!(Value::array(vec![]).to_number(), 0.0);
        assert_eq!(Value::array(vec![Value::Smi(4)]).to_number(), 4.0);
        assert!(Value::array(vec![Value::Smi(4), Value::Smi(5)]).to_number().is_nan());
    }
}

#[cfg(test)]
mod value_to_string_tests {
    use super::*;

    #[test]
    fn test_primitive_to_string() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Smi(-100).to_string(), "-100");
        assert_eq!(Value::BigInt(BigInt::from(12)).to_string(), "12n");
    }

    #[test]
    fn test_double_to_string() {
        assert_eq!(Value::Double(2.0).to_string(), "2");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_native_object_to_string() {
        assert_eq!(Value::native(1u32).to_string(), "[object Object]");
    }
}

#[cfg(test)]
mod value_type_of_tests {
    use super::*;

    #[test]
    fn test_type_of_each_variant() {
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Boolean(true).type_of(), "boolean");
        assert_eq!(Value::Double(1.5).type_of(), "number");
        assert_eq!(Value::string("s").type_of(), "string");
        assert_eq!(Value::BigInt(BigInt::from(1)).type_of(), "bigint");
        assert_eq!(Value::array(vec![]).type_of(), "object");
    }
}
