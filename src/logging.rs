//! Logging init: structured logs to stderr, filter from RUST_LOG.

use tracing_subscriber::EnvFilter;

/// Initialize stderr logging. Falls back to `warn,runprep=info` when
/// `RUST_LOG` is unset. Safe to call once from `main`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,runprep=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
