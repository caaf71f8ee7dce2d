//! Diagnostic logging. Everything goes to stderr so it never mixes with chat
//! output on stdout.

use tracing_subscriber::EnvFilter;

/// Default filter for the interactive chat loop.
pub const CHAT_FILTER: &str = "warn";
/// Default filter for the HTTP server.
pub const SERVE_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Calling it twice keeps the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
