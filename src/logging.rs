//! Diagnostics go to stderr; stdout is reserved for the protocol response.

use tracing_subscriber::EnvFilter;

use crate::settings::DEFAULT_LOG_FILTER;

pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter '{filter}': {e}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
