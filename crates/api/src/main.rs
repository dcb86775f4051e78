//! Tickbook - time tracking client
//!
//! Runs a scripted session against the configured connector and prints the
//! resulting task list and timeline. The default `memory` connector is
//! seeded with a `demo`/`demo` account, so a bare run walks through a full
//! start/stop cycle.

use std::sync::Arc;

use anyhow::Context;
use tickbook_lib::{commands, AppContext, LoginRequest};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    let dotenv = dotenvy::dotenv();

    let config = tickbook_infra::config::load().context("loading configuration")?;
    tickbook_infra::observability::init_logging(&config.logging)
        .context("initialising logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => info!("No .env file loaded: {}", e),
    }

    let ctx = Arc::new(AppContext::new(config).context("building application context")?);
    let identifier = std::env::var("TICKBOOK_USER").unwrap_or_else(|_| "demo".into());
    let secret = std::env::var("TICKBOOK_SECRET").unwrap_or_else(|_| "demo".into());

    let user = match commands::login(&ctx, LoginRequest { identifier, secret, host: None }).await {
        Ok(user) => user,
        Err(err) => {
            warn!(error = %err, "Login failed");
            print_json(&commands::list_errors(&ctx))?;
            return Ok(());
        }
    };
    info!(user = %user.display_name, "Signed in");

    let state = ctx.backend.snapshot();
    if let (Some(task), Some(activity)) = (state.tasks.first(), state.activities.first()) {
        commands::start_task(&ctx, &task.id, &activity.id).await?;
        tokio::time::sleep(ctx.config.timeline.tick_interval() * 2).await;
        commands::stop_task(&ctx, &task.id).await?;
    }

    print_json(&commands::list_tasks(&ctx))?;
    print_json(&ctx.backend.snapshot().timeline)?;
    print_json(&commands::list_errors(&ctx))?;

    commands::logout(&ctx).await?;
    ctx.shutdown().await?;
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
