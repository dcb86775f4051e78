//! Canonical application state

use std::sync::Arc;

use chrono::NaiveDate;
use tickbook_domain::{
    impl_domain_status_conversions, Activity, AuthCredential, ConnectorError, Project, Task,
    TimelineBlock, UserProfile,
};
use uuid::Uuid;

/// Where the login flow stands
///
/// A single enum so "attempting" and "logged in" can never both be true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    LoggedOut,
    AttemptingLogin,
    LoggedIn,
}

impl_domain_status_conversions!(SessionStatus {
    LoggedOut => "logged_out",
    AttemptingLogin => "attempting_login",
    LoggedIn => "logged_in",
});

/// Snapshot of everything the backend knows
///
/// Consumers only ever receive clones; the canonical copy lives inside the
/// backend's [`StateChannel`](super::StateChannel) and changes through
/// actions alone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthCredential,
    pub user: UserProfile,
    pub session: SessionStatus,
    /// Day shown by the timeline
    pub day: NaiveDate,
    pub tasks: Vec<Task>,
    pub activities: Vec<Activity>,
    pub projects: Vec<Project>,
    pub timeline: Vec<TimelineBlock>,
    /// Unacknowledged failures, oldest first
    pub errors: Vec<Arc<ConnectorError>>,
}

impl AppState {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            auth: AuthCredential::default(),
            user: UserProfile::default(),
            session: SessionStatus::LoggedOut,
            day,
            tasks: Vec::new(),
            activities: Vec::new(),
            projects: Vec::new(),
            timeline: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn logged_in(&self) -> bool {
        self.session == SessionStatus::LoggedIn
    }

    pub fn attempting_login(&self) -> bool {
        self.session == SessionStatus::AttemptingLogin
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn find_activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    pub fn find_block(&self, id: &str) -> Option<&TimelineBlock> {
        self.timeline.iter().find(|block| block.id == id)
    }

    pub fn find_error(&self, id: Uuid) -> Option<&Arc<ConnectorError>> {
        self.errors.iter().find(|err| err.id() == id)
    }

    pub fn running_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_running)
    }

    /// The open block of a running task, if the timeline shows one
    pub fn active_block(&self) -> Option<&TimelineBlock> {
        self.timeline.iter().find(|block| {
            block.is_active
                && block
                    .task
                    .as_deref()
                    .and_then(|task_id| self.find_task(task_id))
                    .is_some_and(|task| task.is_running)
        })
    }
}
