//! Backend connector implementations
//!
//! Exactly one connector is wired into a running backend; [`build_connector`]
//! picks it from configuration.

pub mod memory;

use std::sync::Arc;

use tickbook_core::Connector;
use tickbook_domain::constants::MEMORY_CONNECTOR_KIND;
use tickbook_domain::{ConnectorConfig, Result, TickbookError};

pub use memory::{ConnectorOp, MemoryConnector};

/// Instantiate the connector named by `config.kind`
///
/// # Errors
/// Returns `TickbookError::Config` for an unknown kind.
pub fn build_connector(config: &ConnectorConfig) -> Result<Arc<dyn Connector>> {
    match config.kind.trim().to_ascii_lowercase().as_str() {
        MEMORY_CONNECTOR_KIND => {
            let connector =
                if config.seed_demo { MemoryConnector::demo() } else { MemoryConnector::new() };
            tracing::info!(kind = MEMORY_CONNECTOR_KIND, seeded = config.seed_demo, "Connector ready");
            Ok(Arc::new(connector))
        }
        other => Err(TickbookError::Config(format!("Unknown connector kind: {other}"))),
    }
}
