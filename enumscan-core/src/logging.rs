//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout and the report file stay clean.
//! Library code logs through the `tracing` macros directly; this module only
//! installs the subscriber and offers a few plain-message helpers for the CLI.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=enumscan_core=debug`)
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

pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

pub fn log_info(message: &str) {
    info!(detail = %message);
}

pub fn log_error(message: &str) {
    error!(detail = %message);
}
