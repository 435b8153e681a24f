//! Logging initialization
//!
//! `RUST_LOG` takes precedence over the configured default filter.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format.as_str() {
        "json" => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?,
        _ => builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?,
    }

    Ok(())
}
