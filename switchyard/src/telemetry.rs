//! Tracing subscriber setup.

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Build the log filter: `RUST_LOG` when set and valid, `level` otherwise.
pub fn env_filter(level: &str) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

/// Install the global subscriber: an env filter and the `fmt` layer.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer())
        .try_init()
}
