//! Conversions from external infrastructure errors into domain errors.

use std::io;

use tickbook_domain::TickbookError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TickbookError);

impl From<InfraError> for TickbookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TickbookError> for InfraError {
    fn from(value: TickbookError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TickbookError */
/* -------------------------------------------------------------------------- */

impl From<io::Error> for InfraError {
    fn from(err: io::Error) -> Self {
        let mapped = match err.kind() {
            io::ErrorKind::NotFound => TickbookError::Config(format!("file not found: {err}")),
            io::ErrorKind::PermissionDenied => {
                TickbookError::Config(format!("permission denied: {err}"))
            }
            _ => TickbookError::Config(format!("failed to read config file: {err}")),
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* Parse errors → TickbookError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(TickbookError::Config(format!("Invalid JSON format: {err}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(err: toml::de::Error) -> Self {
        InfraError(TickbookError::Config(format!("Invalid TOML format: {}", err.message())))
    }
}

impl From<tracing_subscriber::filter::ParseError> for InfraError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        InfraError(TickbookError::Config(format!("Invalid log filter: {err}")))
    }
}
