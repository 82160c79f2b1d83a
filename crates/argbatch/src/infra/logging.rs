//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ARGBATCH_LOG";

/// Install the global subscriber. Output goes to stderr so stdout stays parseable.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
