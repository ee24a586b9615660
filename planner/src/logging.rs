//! Development-time tracing for debugging planner decisions.
//!
//! The executor emits `tracing` events for plan adoption, restoration, aborts,
//! and malformed plans. Embedders that already install a subscriber don't need
//! this module.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=planner=debug cargo test
/// ```
pub fn init() {
    if let Err(err) = try_init() {
        eprintln!("{:#}", err);
    }
}

/// Like [`init`], but reports an error if a global subscriber is already set.
pub fn try_init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|err| anyhow!("install tracing subscriber: {}", err))
}
