//! Session commands

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tickbook_domain::{AuthCredential, Result, TickbookError, UserProfile};
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::{log_command_result, queued_error};

/// Login form input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: String,
    /// Backend host; the configured host when omitted
    #[serde(default)]
    pub host: Option<String>,
}

/// Sign in, then load the task lists and the selected day
pub async fn login(ctx: &Arc<AppContext>, request: LoginRequest) -> Result<UserProfile> {
    let command_name = "session::login";
    let start = Instant::now();

    let result = run_login(ctx, request).await;
    log_command_result(command_name, start, &result);
    result
}

async fn run_login(ctx: &Arc<AppContext>, request: LoginRequest) -> Result<UserProfile> {
    if request.identifier.trim().is_empty() {
        return Err(TickbookError::InvalidInput("identifier must not be empty".into()));
    }

    let host = request.host.unwrap_or_else(|| ctx.config.connector.host.clone());
    let credential = AuthCredential::new(request.identifier.trim(), request.secret, host);

    let user = ctx.backend.login(credential).await.map_err(|err| queued_error(&err))?;
    info!(user_id = %user.id, "Session started; loading lists");

    ctx.backend.list_tasks().await;
    // A failed timeline load is already queued; the session is still usable.
    let _ = ctx.backend.list_day_timeline(None).await;
    ctx.sync_ticker().await;

    Ok(user)
}

/// End the session and stop the ticker
pub async fn logout(ctx: &Arc<AppContext>) -> Result<()> {
    let command_name = "session::logout";
    let start = Instant::now();

    ctx.backend.logout();
    ctx.sync_ticker().await;

    let result = Ok(());
    log_command_result(command_name, start, &result);
    result
}
