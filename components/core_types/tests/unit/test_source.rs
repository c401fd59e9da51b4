//! Unit tests for SourcePosition and StackFrame

use core_types::{SourcePosition, StackFrame};

#[test]
fn test_op_position_uses_index_as_column_and_offset() {
    let pos = SourcePosition::at_op(7);
    assert_eq!(pos, SourcePosition::new(1, 7, 7));
}

#[test]
fn test_frame_in_named_function() {
    let frame = StackFrame::in_function("fibonacci", 12);

    assert_eq!(frame.function_name.as_deref(), Some("fibonacci"));
    assert_eq!(frame.source_url, None);
    assert_eq!(frame.column, 12);
}

#[test]
fn test_frame_display_with_source_url() {
    let frame = StackFrame {
        source_url: Some("app.js".to_string()),
        ..StackFrame::in_function("inner", 10)
    };

    assert_eq!(frame.to_string(), "    at inner (app.js:1:10)");
}
