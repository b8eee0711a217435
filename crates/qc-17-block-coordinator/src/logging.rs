//! Tracing subscriber setup for binaries hosting the coordinator

use crate::config::LoggingConfig;
use crate::error::{BlockCoordinatorError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails instead of
/// panicking if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| BlockCoordinatorError::InvalidConfig(e.to_string()))?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| BlockCoordinatorError::InvalidConfig(e.to_string()))?;

    tracing::info!(level = %config.level, json = config.json, "[qc-17] Logging initialized");
    Ok(())
}
