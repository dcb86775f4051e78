//! Timeline commands

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tickbook_domain::{Result, TickbookError, TimelineBlock};

use crate::context::AppContext;
use crate::utils::logging::{log_command_result, queued_error};

/// Switch the timeline to `date` and return its blocks
pub async fn select_day(ctx: &Arc<AppContext>, date: NaiveDate) -> Result<Vec<TimelineBlock>> {
    let command_name = "timeline::select_day";
    let start = Instant::now();

    let result = match ctx.backend.list_day_timeline(Some(date)).await {
        Ok(()) => {
            ctx.sync_ticker().await;
            Ok(ctx.backend.snapshot().timeline)
        }
        Err(err) => Err(queued_error(&err)),
    };

    log_command_result(command_name, start, &result);
    result
}

/// Save an edited block
///
/// The edit shows on the timeline right away; this resolves once the save
/// and the follow-up reloads have finished.
pub async fn edit_timeline_block(ctx: &Arc<AppContext>, block: TimelineBlock) -> Result<()> {
    let command_name = "timeline::edit_timeline_block";
    let start = Instant::now();

    let result = run_edit(ctx, block).await;
    log_command_result(command_name, start, &result);
    result
}

async fn run_edit(ctx: &Arc<AppContext>, block: TimelineBlock) -> Result<()> {
    let block_id = block.id.clone();
    let pending = ctx
        .backend
        .update_timeline_block(block)
        .ok_or_else(|| TickbookError::NotFound(format!("timeline block {block_id}")))?;

    pending
        .await
        .map_err(|err| TickbookError::Internal(format!("timeline save task failed: {err}")))?;
    ctx.sync_ticker().await;
    Ok(())
}
