//! Integration test suite for the generator runtime
//!
//! Verifies that the protocol layer, the iterable adapter and the
//! generator compiler work together across crate boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use generator_compiler;
    pub use iteration;
}
