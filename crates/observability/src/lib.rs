//! Tracing/logging setup shared by binaries and tests that embed the engine.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LogFormat, init, init_for_tests, init_with};
