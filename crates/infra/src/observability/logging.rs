//! Process-wide log subscriber
//!
//! `RUST_LOG` wins when set; otherwise the configured level is used as the
//! filter directive. Output is human-readable by default and one JSON object
//! per line when `logging.json` is enabled.

use tickbook_domain::{LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::errors::InfraError;

/// Filter for `config`, honouring `RUST_LOG`
///
/// # Errors
/// Returns `TickbookError::Config` when the configured level is not a valid
/// filter directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level).map_err(InfraError::from)?),
    }
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed (tests, or a
/// host application that set up its own).
///
/// # Errors
/// Returns `TickbookError::Config` for an invalid level.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, json = config.json, "Logging initialised");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
