//! Error types used throughout the application

pub mod connector;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use connector::{
    ConnectorError, ConnectorResult, ErrorInfo, ErrorIntent, ErrorKind, ErrorPresentation,
    ErrorSeverity,
};

/// Main error type for Tickbook
///
/// Connector failures travel through the backend's error queue as
/// [`ConnectorError`]; this enum covers everything around them (config,
/// command lookups, runtime plumbing).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TickbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connector error: {0}")]
    Connector(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConnectorError> for TickbookError {
    fn from(err: ConnectorError) -> Self {
        Self::Connector(err.to_string())
    }
}

/// Result type alias for Tickbook operations
pub type Result<T> = std::result::Result<T, TickbookError>;
