use std::time::{Duration, Instant};

use tickbook_domain::{ConnectorError, Result, TickbookError};
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"tasks::start_task"`; never
/// pass user data through it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Log a finished command, including the error label when it failed.
pub fn log_command_result<T>(command: &str, started: Instant, result: &Result<T>) {
    log_command_execution(command, started.elapsed(), result.is_ok());

    if let Err(err) = result {
        warn!(command, error_type = error_label(err), error = %err, "command_failed");
    }
}

/// Convert a `TickbookError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &TickbookError) -> &'static str {
    match error {
        TickbookError::Config(_) => "config",
        TickbookError::Connector(_) => "connector",
        TickbookError::NotFound(_) => "not_found",
        TickbookError::InvalidInput(_) => "invalid_input",
        TickbookError::Internal(_) => "internal",
    }
}

/// Command result for an action whose failure went to the error queue
///
/// The queued error stays in the queue for the presentation layer; the
/// command additionally reports it to its caller.
pub fn queued_error(err: &ConnectorError) -> TickbookError {
    TickbookError::Connector(format!("[{}] {}", err.kind(), err.message()))
}
