//! # splice-logging
//!
//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs the process-wide stderr subscriber
//! - [`LogFormat`] picks between compact human output and JSON lines
//! - [`test_utils::capture_logs`] captures events in memory for assertions

#![deny(unsafe_code)]

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Output format for the stderr subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line human output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at startup. Subsequent calls are no-ops. `RUST_LOG`, when set,
/// takes precedence over `level`.
pub fn init_subscriber(level: &str) {
    init_subscriber_with_format(level, LogFormat::Compact);
}

/// Initialize the global tracing subscriber with an explicit output format.
pub fn init_subscriber_with_format(level: &str, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // try_init is a no-op if a global subscriber is already set
    let _ = match format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init(),
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
