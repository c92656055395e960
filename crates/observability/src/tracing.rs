//! Tracing/logging initialization.
//!
//! Access denials are logged at `info`, directory failures at `warn`, and the
//! per-step decision trail at `debug` (`RUST_LOG=dirguard_auth=debug`).

use tracing_subscriber::EnvFilter;

/// Output format of the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers.
    #[default]
    Json,
    /// Human-readable lines.
    Pretty,
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize tracing with JSON output and `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(LogFormat::Json, "info");
}

/// Initialize tracing with an explicit format and fallback filter.
pub fn init_with(format: LogFormat, default_directive: &str) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

/// Subscriber for tests: output captured by the test harness, `debug` by default.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("debug"))
        .with_test_writer()
        .try_init();
}
