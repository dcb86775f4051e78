//! Integration tests for backend actions against a scripted connector

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use tickbook_core::{Backend, SessionStatus};
use tickbook_domain::{
    Activity, AuthCredential, ConnectorError, ErrorKind, NewTask, Project, Task, TimelineBlock,
};

mod support;
use support::{credential, nine_am, Harness, Op};

fn may_6() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn login_commits_session_and_profile() {
    let harness = Harness::new();

    let user = harness.backend.login(credential()).await.expect("valid credential");
    let state = harness.backend.snapshot();

    assert_eq!(user.id, "U-1");
    assert!(state.logged_in());
    assert!(!state.attempting_login());
    assert_eq!(state.user.extra["employee_name"], "EMP-0001");
    assert_eq!(state.auth.identifier, "ada");
    assert!(state.errors.is_empty());
}

#[tokio::test]
async fn failed_login_queues_login_error_and_leaves_nothing_behind() {
    let harness = Harness::new();

    let bad = AuthCredential::new("ada", "wrong", "https://tickbook.test");
    let err = harness.backend.login(bad).await.expect_err("wrong secret");
    let state = harness.backend.snapshot();

    assert_eq!(err.kind(), ErrorKind::Login);
    assert_eq!(state.session, SessionStatus::LoggedOut);
    assert!(state.auth.is_empty());
    assert!(state.user.id.is_empty());
    assert_eq!(state.errors.len(), 1);
    assert!(Arc::ptr_eq(&state.errors[0], &err));
}

#[tokio::test]
async fn login_in_flight_is_visible_as_attempting() {
    let harness = Harness::new();
    harness.connector.hold(Op::Login);

    let backend = harness.backend.clone();
    let pending = tokio::spawn(async move { backend.login(credential()).await });
    harness.wait_for_calls(Op::Login, 1).await;

    let state = harness.backend.snapshot();
    assert!(state.attempting_login());
    assert!(!state.logged_in());

    harness.connector.release(Op::Login);
    pending.await.unwrap().expect("login succeeds");
    assert_eq!(harness.backend.snapshot().session, SessionStatus::LoggedIn);
}

#[tokio::test]
async fn logout_clears_session_data_but_keeps_errors() {
    let harness = Harness::logged_in().await;
    harness.backend.throw_error(ConnectorError::read("stale"));

    harness.backend.logout();
    let state = harness.backend.snapshot();

    assert!(!state.logged_in());
    assert!(state.tasks.is_empty());
    assert!(state.projects.is_empty());
    assert_eq!(state.errors.len(), 1);
}

// ============================================================================
// list_tasks
// ============================================================================

#[tokio::test]
async fn list_tasks_replaces_all_lists_in_one_commit() {
    let harness = Harness::new();
    harness.backend.login(credential()).await.unwrap();
    let mut sub = harness.backend.subscribe();

    harness.backend.list_tasks().await;

    let seen = sub.changed().await.expect("backend alive");
    assert!(!sub.has_changed(), "exactly one publish");
    assert_eq!(seen.projects.len(), 2);
    assert_eq!(seen.activities.len(), 2);
    assert_eq!(seen.tasks.len(), 2);
}

#[tokio::test]
async fn list_tasks_failure_keeps_previous_lists() {
    let harness = Harness::logged_in().await;
    let before = harness.backend.snapshot();
    harness.connector.seed(
        vec![
            Project::new("P-1", "Internal"),
            Project::new("P-2", "Client"),
            Project::new("P-3", "Research"),
        ],
        vec![Activity::new("A-1", "Development"), Activity::new("A-3", "Support")],
        vec![
            Task::new("T-1", "Write report"),
            Task::new("T-2", "Review code"),
            Task::new("T-3", "Plan sprint"),
        ],
    );
    harness.connector.fail(Op::ListProjects, ConnectorError::read("Could not load projects"));

    harness.backend.list_tasks().await;
    let state = harness.backend.snapshot();

    assert_eq!(state.projects, before.projects);
    assert_eq!(state.activities, before.activities);
    assert_eq!(state.tasks, before.tasks);
    assert_eq!(state.errors.len(), 1);
    assert_eq!(state.errors[0].kind(), ErrorKind::Read);
    assert_eq!(state.errors[0].message(), "Could not load projects");
}

// ============================================================================
// start / stop / new
// ============================================================================

#[tokio::test]
async fn start_then_stop_books_elapsed_time() {
    let harness = Harness::logged_in().await;
    let task = harness.task("T-1");
    let activity = harness.activity("A-1");

    harness.backend.start_task(&task, &activity).await;
    let running = harness.task("T-1");
    assert!(running.is_running);
    assert_eq!(running.last_open_timestamp, Some(nine_am()));
    assert!(running.is_consistent());

    harness.clock.advance(Duration::minutes(90));
    harness.backend.stop_task(&running).await;

    let stopped = harness.task("T-1");
    assert!(!stopped.is_running);
    assert!(stopped.last_open_timestamp.is_none());
    assert!((stopped.total_hours - 1.5).abs() < 1e-9);
    assert!(harness.backend.snapshot().errors.is_empty());
}

#[tokio::test]
async fn failed_start_queues_update_error_without_refresh() {
    let harness = Harness::logged_in().await;
    harness.connector.fail(Op::StartTask, ConnectorError::update("Task is locked"));
    let list_calls = harness.connector.calls(Op::ListTasks);

    harness.backend.start_task(&harness.task("T-1"), &harness.activity("A-1")).await;
    let state = harness.backend.snapshot();

    assert_eq!(harness.connector.calls(Op::ListTasks), list_calls);
    assert!(!state.find_task("T-1").unwrap().is_running);
    assert_eq!(state.errors.len(), 1);
    assert_eq!(state.errors[0].kind(), ErrorKind::Update);
    assert!(!harness.backend.is_task_busy("T-1"));
}

#[tokio::test]
async fn different_tasks_start_concurrently() {
    let harness = Harness::logged_in().await;
    let activity = harness.activity("A-1");
    let tasks = [harness.task("T-1"), harness.task("T-2")];

    join_all(tasks.iter().map(|task| harness.backend.start_task(task, &activity))).await;

    let state = harness.backend.snapshot();
    assert!(state.errors.is_empty());
    assert_eq!(harness.connector.calls(Op::StartTask), 2);
    assert_eq!(state.running_tasks().count(), 2);
}

#[tokio::test]
async fn second_start_while_first_is_in_flight_is_rejected() {
    let harness = Harness::logged_in().await;
    harness.connector.hold(Op::StartTask);
    let task = harness.task("T-1");
    let activity = harness.activity("A-1");

    let backend = harness.backend.clone();
    let (first_task, first_activity) = (task.clone(), activity.clone());
    let first = tokio::spawn(async move { backend.start_task(&first_task, &first_activity).await });
    harness.wait_for_calls(Op::StartTask, 1).await;
    assert!(harness.backend.is_task_busy("T-1"));

    harness.backend.start_task(&task, &activity).await;
    let state = harness.backend.snapshot();
    assert_eq!(harness.connector.calls(Op::StartTask), 1);
    assert_eq!(state.errors.len(), 1);
    assert_eq!(state.errors[0].kind(), ErrorKind::InvalidOperation);

    harness.connector.release(Op::StartTask);
    first.await.unwrap();
    assert!(harness.task("T-1").is_running);
    assert!(!harness.backend.is_task_busy("T-1"));
}

#[tokio::test]
async fn new_task_shows_up_after_refresh() {
    let harness = Harness::logged_in().await;
    let mut draft = NewTask::new("Plan sprint");
    draft.tags = vec!["planning".into()];

    harness.backend.new_task(draft).await;
    let state = harness.backend.snapshot();

    assert_eq!(state.tasks.len(), 3);
    assert!(state.tasks.iter().any(|task| task.label == "Plan sprint"));
}

#[tokio::test]
async fn failed_new_task_queues_create_error() {
    let harness = Harness::logged_in().await;
    harness.connector.fail(Op::NewTask, ConnectorError::create("Label is required"));

    harness.backend.new_task(NewTask::new("")).await;
    let state = harness.backend.snapshot();

    assert_eq!(state.tasks.len(), 2);
    assert_eq!(state.errors[0].kind(), ErrorKind::Create);
}

// ============================================================================
// Timeline
// ============================================================================

#[tokio::test]
async fn set_current_date_commits_day_and_blocks_together() {
    let harness = Harness::logged_in().await;
    let tuesday = may_6().succ_opt().unwrap();
    let start = nine_am() + Duration::days(1);
    harness.connector.add_block(TimelineBlock::new("B-9", start, start + Duration::hours(1)));
    let mut sub = harness.backend.subscribe();

    harness.backend.set_current_date(tuesday).await;

    let seen = sub.changed().await.unwrap();
    assert!(!sub.has_changed());
    assert_eq!(seen.day, tuesday);
    assert_eq!(seen.timeline.len(), 1);
    assert_eq!(seen.timeline[0].id, "B-9");
}

#[tokio::test]
async fn failed_timeline_load_leaves_day_unchanged() {
    let harness = Harness::logged_in().await;
    harness.connector.fail(Op::ListDayTimeline, ConnectorError::read("Timeline unavailable"));

    let err = harness
        .backend
        .list_day_timeline(Some(may_6().succ_opt().unwrap()))
        .await
        .expect_err("connector fails");
    let state = harness.backend.snapshot();

    assert_eq!(err.kind(), ErrorKind::Read);
    assert_eq!(state.day, may_6());
    assert_eq!(state.errors.len(), 1);
}

#[tokio::test]
async fn active_block_update_is_local_only() {
    let harness = Harness::logged_in().await;
    harness.backend.start_task(&harness.task("T-1"), &harness.activity("A-1")).await;
    harness.backend.list_day_timeline(None).await.unwrap();
    let block = harness.backend.snapshot().active_block().cloned().expect("active block");
    let update_calls = harness.connector.calls(Op::UpdateTimelineItem);

    let later = nine_am() + Duration::minutes(10);
    assert!(harness.backend.update_active_timeline_block(&block.id, later));
    assert!(!harness.backend.update_active_timeline_block("missing", later));

    assert_eq!(harness.backend.snapshot().find_block(&block.id).unwrap().end, later);
    assert_eq!(harness.connector.stored_block(&block.id).unwrap().end, nine_am());
    assert_eq!(harness.connector.calls(Op::UpdateTimelineItem), update_calls);
}

#[tokio::test]
async fn timeline_edit_is_visible_before_the_server_answers() {
    let harness = Harness::logged_in().await;
    let start = nine_am();
    harness.connector.add_block(TimelineBlock::new("B-1", start, start + Duration::hours(1)));
    harness.backend.list_day_timeline(None).await.unwrap();
    harness.connector.hold(Op::UpdateTimelineItem);

    let mut edited = harness.backend.snapshot().find_block("B-1").cloned().unwrap();
    edited.end = start + Duration::hours(2);
    let pending = harness.backend.update_timeline_block(edited.clone()).expect("block exists");

    assert_eq!(harness.backend.snapshot().find_block("B-1"), Some(&edited));
    assert_eq!(harness.connector.stored_block("B-1").unwrap().end, start + Duration::hours(1));

    harness.connector.release(Op::UpdateTimelineItem);
    pending.await.unwrap();

    assert_eq!(harness.connector.stored_block("B-1"), Some(edited.clone()));
    assert_eq!(harness.backend.snapshot().find_block("B-1"), Some(&edited));
}

#[tokio::test]
async fn rejected_timeline_edit_is_reconciled_with_server() {
    let harness = Harness::logged_in().await;
    let start = nine_am();
    let original = TimelineBlock::new("B-1", start, start + Duration::hours(1));
    harness.connector.add_block(original.clone());
    harness.backend.list_day_timeline(None).await.unwrap();
    harness.connector.fail(Op::UpdateTimelineItem, ConnectorError::update("Overlaps another block"));

    let mut edited = original.clone();
    edited.start = start - Duration::hours(3);
    let list_calls = harness.connector.calls(Op::ListTasks);
    harness.backend.update_timeline_block(edited).unwrap().await.unwrap();
    let state = harness.backend.snapshot();

    assert_eq!(state.find_block("B-1"), Some(&original));
    assert_eq!(state.errors.len(), 1);
    assert_eq!(state.errors[0].kind(), ErrorKind::Update);
    assert_eq!(harness.connector.calls(Op::ListTasks), list_calls + 1);
}

#[tokio::test]
async fn editing_an_unknown_block_does_nothing() {
    let harness = Harness::logged_in().await;
    let before = harness.backend.snapshot();
    let sub = harness.backend.subscribe();

    let ghost = TimelineBlock::new("nope", nine_am(), nine_am());
    assert!(harness.backend.update_timeline_block(ghost).is_none());

    assert!(!sub.has_changed());
    assert_eq!(harness.connector.calls(Op::UpdateTimelineItem), 0);
    assert_eq!(harness.backend.snapshot().timeline, before.timeline);
}

// ============================================================================
// Error queue
// ============================================================================

#[tokio::test]
async fn dismiss_removes_only_that_error() {
    let harness = Harness::new();
    let first = harness.backend.throw_error(ConnectorError::read("Same message"));
    let second = harness.backend.throw_error(ConnectorError::read("Same message"));

    assert!(harness.backend.dismiss_error(&first));
    let state = harness.backend.snapshot();
    assert_eq!(state.errors.len(), 1);
    assert!(Arc::ptr_eq(&state.errors[0], &second));

    assert!(!harness.backend.dismiss_error(&first));
    assert!(harness.backend.dismiss_error_by_id(second.id()));
    assert!(harness.backend.snapshot().errors.is_empty());
}

#[tokio::test]
async fn dismiss_by_id_removes_one_of_two_clones() {
    let harness = Harness::new();
    let cached = ConnectorError::read("Cached failure");
    let first = harness.backend.throw_error(cached.clone());
    let second = harness.backend.throw_error(cached);
    assert_eq!(first.id(), second.id());

    assert!(harness.backend.dismiss_error_by_id(first.id()));
    let state = harness.backend.snapshot();
    assert_eq!(state.errors.len(), 1);
    assert!(Arc::ptr_eq(&state.errors[0], &second));

    assert!(harness.backend.dismiss_error_by_id(second.id()));
    assert!(!harness.backend.dismiss_error_by_id(second.id()));
}

#[tokio::test]
async fn throw_error_with_hands_back_the_queued_error() {
    let harness = Harness::new();
    let mut seen = None;

    let queued = harness
        .backend
        .throw_error_with(ConnectorError::not_ready("Still connecting"), |err| {
            seen = Some(Arc::clone(err));
        });

    assert!(Arc::ptr_eq(&seen.unwrap(), &queued));
    assert_eq!(queued.presentation().timeout_ms, 5_000);
}

#[tokio::test(start_paused = true)]
async fn errors_auto_dismiss_when_configured() {
    let connector = support::seeded_connector();
    let backend = Backend::builder(connector)
        .auto_dismiss_after(Some(StdDuration::from_secs(5)))
        .build();

    backend.throw_error(ConnectorError::read("Temporary"));
    assert_eq!(backend.snapshot().errors.len(), 1);

    tokio::time::sleep(StdDuration::from_secs(4)).await;
    assert_eq!(backend.snapshot().errors.len(), 1);

    tokio::time::sleep(StdDuration::from_secs(2)).await;
    assert!(backend.snapshot().errors.is_empty());
}

// ============================================================================
// Consumers
// ============================================================================

#[tokio::test]
async fn connected_context_sees_actions_of_other_consumers() {
    let harness = Harness::new();
    let mut view = harness.backend.connect();
    let other = harness.backend.connect();

    other.actions.login(credential()).await.unwrap();

    let mut state = view.snapshot();
    while !state.logged_in() {
        state = view.state.changed().await.expect("backend alive");
    }
    assert_eq!(state.user.display_name, "Ada Lovelace");
}
