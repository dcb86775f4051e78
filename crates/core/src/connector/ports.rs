//! Port interface for the remote record-keeping backend
//!
//! A connector owns the wire protocol and schema of one backend. The core
//! only ever talks to it through this trait, and exactly one connector is
//! wired into a running backend.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tickbook_domain::{
    Activity, AuthCredential, ConnectorResult, NewTask, Project, Task, TimelineBlock, UserProfile,
};

/// Capability interface implemented by backend connectors
///
/// Each method fails with the [`ConnectorError`](tickbook_domain::ConnectorError)
/// kind noted on it.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Authenticate and fetch the user's profile (login)
    async fn login(&self, auth: &AuthCredential) -> ConnectorResult<UserProfile>;

    /// Tasks visible to the given user (read)
    async fn list_tasks(&self, user_id: &str) -> ConnectorResult<Vec<Task>>;

    /// Activities time can be booked against (read)
    async fn list_activities(&self) -> ConnectorResult<Vec<Activity>>;

    /// Known projects (read)
    async fn list_projects(&self) -> ConnectorResult<Vec<Project>>;

    /// Persist a running state for `task` from `timestamp` (update)
    async fn start_task(
        &self,
        task: &Task,
        activity: &Activity,
        timestamp: DateTime<Utc>,
        user_id: &str,
    ) -> ConnectorResult<()>;

    /// Persist the end of the running interval at `timestamp` (update)
    async fn stop_task(
        &self,
        task: &Task,
        timestamp: DateTime<Utc>,
        user_id: &str,
    ) -> ConnectorResult<()>;

    /// Create a task from a draft (create)
    async fn new_task(&self, task: &NewTask) -> ConnectorResult<()>;

    /// Worked blocks for one day (read)
    async fn list_day_timeline(
        &self,
        date: NaiveDate,
        tasks: &[Task],
    ) -> ConnectorResult<Vec<TimelineBlock>>;

    /// Persist an edited block and return what the server stored (update)
    async fn update_timeline_item(&self, item: &TimelineBlock) -> ConnectorResult<TimelineBlock>;
}
