//! Ticker error types

use thiserror::Error;
use tickbook_domain::TickbookError;

/// Ticker lifecycle errors
#[derive(Debug, Error)]
pub enum TickerError {
    /// `start` was called outside a Tokio runtime
    #[error("No Tokio runtime available to drive the ticker")]
    NoRuntime,

    /// The tick loop did not exit in time after cancellation
    #[error("Ticker stop timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The tick loop panicked or was aborted
    #[error("Ticker task join failed: {0}")]
    JoinFailed(String),
}

impl From<TickerError> for TickbookError {
    fn from(err: TickerError) -> Self {
        TickbookError::Internal(err.to_string())
    }
}

/// Convenience type alias for ticker operations
pub type TickerResult<T> = Result<T, TickerError>;
