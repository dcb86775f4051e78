//! Task list commands

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tickbook_core::AppState;
use tickbook_domain::{Activity, NewTask, Result, Task, TickbookError};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::context::AppContext;
use crate::utils::logging::log_command_result;

/// One row of the task list, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TaskView {
    pub id: String,
    pub label: String,
    pub project: Option<String>,
    pub parent_label: Option<String>,
    pub tags: Vec<String>,
    pub description_preview: String,
    pub is_running: bool,
    /// Booked time plus the open interval, in milliseconds
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub running_total_ms: i64,
}

impl TaskView {
    fn from_task(task: &Task, ctx: &AppContext) -> Self {
        Self {
            id: task.id.clone(),
            label: task.label.clone(),
            project: task.project.clone(),
            parent_label: task.parent_label.clone(),
            tags: task.display_tags().map(str::to_string).collect(),
            description_preview: task.description_preview().to_string(),
            is_running: task.is_running,
            running_total_ms: task.running_total(ctx.backend.now()).num_milliseconds(),
        }
    }
}

/// Task rows from the current snapshot
pub fn list_tasks(ctx: &Arc<AppContext>) -> Vec<TaskView> {
    ctx.backend.snapshot().tasks.iter().map(|task| TaskView::from_task(task, ctx)).collect()
}

/// Reload projects, activities and tasks
pub async fn refresh(ctx: &Arc<AppContext>) -> Result<Vec<TaskView>> {
    let command_name = "tasks::refresh";
    let start = Instant::now();

    ctx.backend.list_tasks().await;
    let result = Ok(list_tasks(ctx));

    log_command_result(command_name, start, &result);
    result
}

/// Start `task_id` under `activity_id`
pub async fn start_task(ctx: &Arc<AppContext>, task_id: &str, activity_id: &str) -> Result<()> {
    let command_name = "tasks::start_task";
    let start = Instant::now();

    let result = run_start_task(ctx, task_id, activity_id).await;
    log_command_result(command_name, start, &result);
    result
}

async fn run_start_task(ctx: &Arc<AppContext>, task_id: &str, activity_id: &str) -> Result<()> {
    let state = ctx.backend.snapshot();
    let task = resolve_task(&state, task_id)?;
    let activity = resolve_activity(&state, activity_id)?;

    ctx.backend.start_task(&task, &activity).await;
    reload_timeline(ctx).await;
    Ok(())
}

/// Stop `task_id`
pub async fn stop_task(ctx: &Arc<AppContext>, task_id: &str) -> Result<()> {
    let command_name = "tasks::stop_task";
    let start = Instant::now();

    let result = run_stop_task(ctx, task_id).await;
    log_command_result(command_name, start, &result);
    result
}

async fn run_stop_task(ctx: &Arc<AppContext>, task_id: &str) -> Result<()> {
    let task = resolve_task(&ctx.backend.snapshot(), task_id)?;

    ctx.backend.stop_task(&task).await;
    reload_timeline(ctx).await;
    Ok(())
}

/// Create a task from a draft
pub async fn create_task(ctx: &Arc<AppContext>, draft: NewTask) -> Result<()> {
    let command_name = "tasks::create_task";
    let start = Instant::now();

    let result = if draft.label.trim().is_empty() {
        Err(TickbookError::InvalidInput("task label must not be empty".into()))
    } else {
        ctx.backend.new_task(draft).await;
        Ok(())
    };

    log_command_result(command_name, start, &result);
    result
}

/// Show the running block on the timeline and point the ticker at it
async fn reload_timeline(ctx: &AppContext) {
    let _ = ctx.backend.list_day_timeline(None).await;
    ctx.sync_ticker().await;
}

fn resolve_task(state: &AppState, task_id: &str) -> Result<Task> {
    state
        .find_task(task_id)
        .cloned()
        .ok_or_else(|| TickbookError::NotFound(format!("task {task_id}")))
}

fn resolve_activity(state: &AppState, activity_id: &str) -> Result<Activity> {
    state
        .find_activity(activity_id)
        .cloned()
        .ok_or_else(|| TickbookError::NotFound(format!("activity {activity_id}")))
}
