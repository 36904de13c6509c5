pub mod config;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod storage;

use tracing_subscriber::EnvFilter;

/// Structured logging for both binaries; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
