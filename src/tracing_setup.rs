//! Logging initialization
//!
//! Console logging through `tracing-subscriber`, filtered by RUST_LOG
//! (default: `info`, with noisy dependency crates held at `warn`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,lopdf=warn,pdf_extract=warn,hyper=warn,reqwest=warn";

/// Initialize the global tracing subscriber
///
/// Returns an error if a global subscriber was already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Console logging initialized"
    );

    Ok(())
}
