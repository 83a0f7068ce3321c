//! Diagnostic logging setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's call. Diagnostics go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "CASEBOOK_LOG";

/// Picks the filter directive: `CASEBOOK_LOG`, then the config value.
pub fn resolve_filter(env_value: Option<String>, configured: &str) -> String {
    match env_value {
        Some(v) if !v.trim().is_empty() => v,
        _ => configured.to_string(),
    }
}

/// Installs the global fmt subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(configured: &str) {
    let directive = resolve_filter(std::env::var(LOG_ENV).ok(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
