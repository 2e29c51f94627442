//! Diagnostic logging setup.
//!
//! Logs go to stderr so that report output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Filter directive for the given `-v` count. Explicit flags win over the
/// environment; without either the level is `warn`.
pub fn filter_directive(verbosity: u8, env_value: Option<&str>) -> String {
    match (verbosity, env_value) {
        (0, Some(value)) if !value.trim().is_empty() => value.trim().to_string(),
        (0, _) => "warn".to_string(),
        (1, _) => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(verbosity, env_value.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
