//! # Logging
//!
//! Opt-in tracing initialization for binaries built on the library.
//! Controlled through `RUST_LOG`, defaulting to warnings only so prompt
//! output stays clean.

/// Initialize the global tracing subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
