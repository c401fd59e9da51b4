//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition, StackFrame, Value};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_names() {
        let kinds = [
            (ErrorKind::Error, "Error"),
            (ErrorKind::SyntaxError, "SyntaxError"),
            (ErrorKind::TypeError, "TypeError"),
            (ErrorKind::ReferenceError, "ReferenceError"),
            (ErrorKind::RangeError, "RangeError"),
        ];

        for (kind, name) in kinds {
            assert_eq!(kind.name(), name);
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::TypeError, ErrorKind::TypeError);
        assert_ne!(ErrorKind::TypeError, ErrorKind::RangeError);
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(JsError::type_error("t").kind, ErrorKind::TypeError);
        assert_eq!(JsError::range_error("r").kind, ErrorKind::RangeError);
        assert_eq!(JsError::reference_error("x").kind, ErrorKind::ReferenceError);
        assert_eq!(JsError::syntax_error("s").kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn test_js_error_display() {
        let error = JsError::range_error("Maximum call stack size exceeded");
        assert_eq!(error.to_string(), "RangeError: Maximum call stack size exceeded");
    }

    #[test]
    fn test_js_error_with_source_position() {
        let error = JsError {
            source_position: Some(SourcePosition::new(10, 5, 150)),
            ..JsError::syntax_error("Unexpected token")
        };

        let pos = error.source_position.unwrap();
        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
    }

    #[test]
    fn test_js_error_with_stack_frames() {
        let error = JsError::reference_error("x is not defined")
            .with_frame(StackFrame::in_function("innerFunction", 4))
            .with_frame(StackFrame::in_function("outerFunction", 9));

        assert_eq!(error.stack.len(), 2);
        assert_eq!(error.stack[0].function_name.as_deref(), Some("innerFunction"));
        assert_eq!(error.stack[1].function_name.as_deref(), Some("outerFunction"));
    }

    #[test]
    fn test_js_error_as_value_round_trips_kind() {
        let value = Value::from(JsError::type_error("not iterable"));

        let error = value.as_error().expect("error value");
        assert_eq!(error.kind, ErrorKind::TypeError);
        assert_eq!(error.message, "not iterable");
    }

    #[test]
    fn test_js_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&JsError::type_error("boxed"));
    }
}
