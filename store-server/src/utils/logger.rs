//! Logging Infrastructure
//!
//! Structured logging via tracing. `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Call once at startup.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
