//! Tracing setup for the logger's own diagnostics
//!
//! Retries, fallback writes and fallback failures are reported through
//! `tracing`. Hosts that already install a subscriber can skip this.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "raptor_log=info";

/// Install a stderr subscriber filtered by `RUST_LOG` (or `default_filter`)
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
