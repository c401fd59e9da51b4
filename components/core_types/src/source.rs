//! Source position and stack frame types for error tracking.
//!
//! Generator bodies are built programmatically rather than parsed, so a
//! "position" is usually an op index inside a compiled body; the types keep
//! the line/column shape so host code can map them back to real sources.

/// Represents a position in source code.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition::new(10, 5, 150);
///
/// assert_eq!(pos.line, 10);
/// assert_eq!(pos.offset, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
    /// Byte offset, or op index for compiled generator bodies
    pub offset: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Position of an op inside a compiled generator body
    pub fn at_op(index: usize) -> Self {
        Self::new(1, u32::try_from(index).unwrap_or(u32::MAX), index)
    }
}

/// Represents a single frame in a JavaScript call stack.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame::in_function("countdown", 3);
///
/// assert_eq!(frame.function_name, Some("countdown".to_string()));
/// assert_eq!(frame.column, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the function, or None for anonymous functions
    pub function_name: Option<String>,
    /// URL or file path of the source, or None if not available
    pub source_url: Option<String>,
    /// Line number where the call occurred
    pub line: u32,
    /// Column number where the call occurred
    pub column: u32,
}

impl StackFrame {
    /// Frame for code running inside a named function at the given op index.
    ///
    /// Anonymous functions (empty name) get `None` as their name.
    pub fn in_function(name: &str, op_index: usize) -> Self {
        StackFrame {
            function_name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
            source_url: None,
            line: 1,
            column: u32::try_from(op_index).unwrap_or(u32::MAX),
        }
    }
}

impl std::fmt::Display for StackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "    at {} ({}:{}:{})",
            self.function_name.as_deref().unwrap_or("<anonymous>"),
            self.source_url.as_deref().unwrap_or("<generator>"),
            self.line,
            self.column
        )
    }
}
