//! Error queue commands

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tickbook_domain::{
    ConnectorError, ErrorKind, ErrorPresentation, ErrorSeverity, Result, TickbookError,
};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::context::AppContext;
use crate::utils::logging::log_command_result;

/// A queued error as a notification
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorView {
    pub id: Uuid,
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub server_messages: Vec<String>,
    pub presentation: ErrorPresentation,
}

impl From<&ConnectorError> for ErrorView {
    fn from(err: &ConnectorError) -> Self {
        Self {
            id: err.id(),
            kind: err.kind(),
            severity: err.severity(),
            message: err.message().to_string(),
            server_messages: err.info().map(|info| info.server_messages.clone()).unwrap_or_default(),
            presentation: err.presentation(),
        }
    }
}

/// Queued errors, oldest first
pub fn list_errors(ctx: &Arc<AppContext>) -> Vec<ErrorView> {
    ctx.backend.snapshot().errors.iter().map(|err| ErrorView::from(err.as_ref())).collect()
}

/// Acknowledge one queued error
pub fn dismiss_error(ctx: &Arc<AppContext>, error_id: Uuid) -> Result<()> {
    let command_name = "errors::dismiss_error";
    let start = Instant::now();

    let result = if ctx.backend.dismiss_error_by_id(error_id) {
        Ok(())
    } else {
        Err(TickbookError::NotFound(format!("error {error_id}")))
    };

    log_command_result(command_name, start, &result);
    result
}
