//! Structured logging for analysis runs.
//!
//! The pipeline stages log through `tracing` as they go:
//!
//! - `debug`: matches per detection technique, registry insertions and
//!   skipped candidates, and the violation count of each usage scan
//! - `info`: one summary per analyzed package (quasi-enum and diagnostic
//!   counts)
//! - `warn`: a blank or unusable enum keyword falling back to `enum`
//!
//! The CLI installs the subscriber below and adds a run-level summary with
//! [`log_event`].

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup. Output is JSON on stderr so stdout stays reserved
/// for diagnostics.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=enumsafety_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Warning without a structured event name, such as an empty input set.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs a named event at the level its name implies.
pub fn log_event(event: &str, detail: &str) {
    match event.to_uppercase().as_str() {
        "ERROR" => error!(event = %event, detail = %detail),
        "WARN" | "WARNING" => warn!(event = %event, detail = %detail),
        _ => info!(event = %event, detail = %detail),
    }
}
