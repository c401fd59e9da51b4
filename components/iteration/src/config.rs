//! Runtime configuration for generator execution

use std::path::Path;

use core_types::JsError;
use serde::{Deserialize, Serialize};

/// Default bound on simultaneously executing generator steps per thread
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 512;

/// Tunables shared by every generator created from the same configuration.
///
/// Missing JSON fields fall back to their defaults.
///
/// # Example
/// ```
/// use iteration::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json_str(r#"{ "max_nesting_depth": 8 }"#).unwrap();
/// assert_eq!(config.max_nesting_depth, 8);
/// assert!(config.strict_protocol);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Nested generator steps allowed at once on one thread
    pub max_nesting_depth: usize,
    /// Treat misbehaving delegated iterators as protocol violations
    pub strict_protocol: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            strict_protocol: true,
        }
    }
}

impl RuntimeConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Enable or disable strict protocol checking
    pub fn with_strict_protocol(mut self, enabled: bool) -> Self {
        self.strict_protocol = enabled;
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self, JsError> {
        serde_json::from_str(json)
            .map_err(|e| JsError::syntax_error(format!("invalid runtime config: {}", e)))
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            JsError::new(
                core_types::ErrorKind::Error,
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&source)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
