//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Does nothing when a subscriber is already set, so tests and embedders
/// can install their own first.
pub fn init_logging(filter: &str) {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("tracing subscriber already initialized, skipping");
        return;
    }

    let filter = if filter.is_empty() {
        EnvFilter::new("info")
    } else {
        EnvFilter::new(filter)
    };

    if let Err(e) = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .try_init()
    {
        eprintln!("failed to install tracing subscriber: {e}");
    }
}
