//! In-memory connector
//!
//! Keeps accounts, reference data, tasks and timeline blocks in process.
//! Used for local runs, demos and tests. Task totals are derived from the
//! closed blocks of each task so start/stop and timeline edits stay
//! consistent with each other.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use tickbook_core::Connector;
use tickbook_domain::constants::MILLIS_PER_HOUR;
use tickbook_domain::{
    impl_domain_status_conversions, Activity, AuthCredential, ConnectorError, ConnectorResult,
    ErrorInfo, ErrorKind, NewTask, Project, Task, TimelineBlock, UserProfile,
};
use tracing::debug;
use uuid::Uuid;

/// Connector operations, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorOp {
    Login,
    ListTasks,
    ListActivities,
    ListProjects,
    StartTask,
    StopTask,
    NewTask,
    ListDayTimeline,
    UpdateTimelineItem,
}

impl_domain_status_conversions!(ConnectorOp {
    Login => "login",
    ListTasks => "list_tasks",
    ListActivities => "list_activities",
    ListProjects => "list_projects",
    StartTask => "start_task",
    StopTask => "stop_task",
    NewTask => "new_task",
    ListDayTimeline => "list_day_timeline",
    UpdateTimelineItem => "update_timeline_item",
});

impl ConnectorOp {
    /// Error kind a failure of this operation carries
    pub fn error_kind(self) -> ErrorKind {
        match self {
            Self::Login => ErrorKind::Login,
            Self::ListTasks | Self::ListActivities | Self::ListProjects | Self::ListDayTimeline => {
                ErrorKind::Read
            }
            Self::StartTask | Self::StopTask | Self::UpdateTimelineItem => ErrorKind::Update,
            Self::NewTask => ErrorKind::Create,
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    identifier: String,
    secret: String,
    profile: UserProfile,
}

#[derive(Debug, Default)]
struct Store {
    accounts: Vec<Account>,
    projects: Vec<Project>,
    activities: Vec<Activity>,
    tasks: Vec<Task>,
    blocks: Vec<TimelineBlock>,
}

impl Store {
    fn task_mut(&mut self, id: &str) -> ConnectorResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| ConnectorError::update(format!("Task '{id}' not found")))
    }

    /// Booked hours of `task_id` from its closed blocks
    fn recompute_total(&mut self, task_id: &str) {
        let booked = self
            .blocks
            .iter()
            .filter(|block| !block.is_active && block.task.as_deref() == Some(task_id))
            .fold(Duration::zero(), |sum, block| sum + block.duration());

        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) {
            task.total_hours = booked.num_milliseconds() as f64 / MILLIS_PER_HOUR;
        }
    }
}

/// Process-local backend
#[derive(Debug, Default)]
pub struct MemoryConnector {
    store: Mutex<Store>,
    failures: Mutex<HashSet<ConnectorOp>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector seeded with a `demo`/`demo` account and a few tasks
    pub fn demo() -> Self {
        let profile = UserProfile::new("U-DEMO", "Demo User")
            .with_field("employee_name", serde_json::json!("EMP-DEMO"));

        let mut report = Task::new("T-100", "Quarterly report");
        report.project = Some("P-1".into());
        report.description = Some("Collect figures and write the summary for Q3".into());
        report.tags = vec!["finance".into(), " reporting ".into()];

        let mut review = Task::new("T-101", "Code review");
        review.project = Some("P-2".into());
        review.parent_label = Some("Platform".into());
        review.tags = vec!["engineering".into()];

        Self::new()
            .with_account("demo", "demo", profile)
            .with_project(Project::new("P-1", "Internal"))
            .with_project(Project::new("P-2", "Platform"))
            .with_activity(Activity::new("A-1", "Development"))
            .with_activity(Activity::new("A-2", "Meetings"))
            .with_activity(Activity::new("A-3", "Support"))
            .with_task(report)
            .with_task(review)
    }

    pub fn with_account(self, identifier: &str, secret: &str, profile: UserProfile) -> Self {
        self.store.lock().accounts.push(Account {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
            profile,
        });
        self
    }

    pub fn with_project(self, project: Project) -> Self {
        self.store.lock().projects.push(project);
        self
    }

    pub fn with_activity(self, activity: Activity) -> Self {
        self.store.lock().activities.push(activity);
        self
    }

    pub fn with_task(self, task: Task) -> Self {
        self.store.lock().tasks.push(task);
        self
    }

    /// Add a closed block and fold it into its task's total
    pub fn with_block(self, block: TimelineBlock) -> Self {
        {
            let mut store = self.store.lock();
            let task_id = block.task.clone();
            store.blocks.push(block);
            if let Some(task_id) = task_id {
                store.recompute_total(&task_id);
            }
        }
        self
    }

    /// Make every call of `op` fail until [`clear_failures`](Self::clear_failures)
    pub fn fail_on(&self, op: ConnectorOp) {
        self.failures.lock().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Stored copy of a block
    pub fn block(&self, id: &str) -> Option<TimelineBlock> {
        self.store.lock().blocks.iter().find(|block| block.id == id).cloned()
    }

    fn check(&self, op: ConnectorOp) -> ConnectorResult<()> {
        if self.failures.lock().contains(&op) {
            debug!(%op, "Injected connector failure");
            return Err(ConnectorError::new(op.error_kind(), format!("{op} is unavailable"))
                .with_info(ErrorInfo::with_server_messages([format!(
                    "Service unavailable while handling {op}"
                )])));
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    fn name(&self) -> &str {
        "memory"
    }

    async fn login(&self, auth: &AuthCredential) -> ConnectorResult<UserProfile> {
        self.check(ConnectorOp::Login)?;
        if auth.host.trim().is_empty() {
            return Err(ConnectorError::login("No server host given"));
        }

        let store = self.store.lock();
        store
            .accounts
            .iter()
            .find(|account| account.identifier == auth.identifier && account.secret == auth.secret)
            .map(|account| account.profile.clone())
            .ok_or_else(|| {
                ConnectorError::login("Invalid username or password").with_info(
                    ErrorInfo::with_server_messages(["Authentication failed"]),
                )
            })
    }

    async fn list_tasks(&self, user_id: &str) -> ConnectorResult<Vec<Task>> {
        self.check(ConnectorOp::ListTasks)?;
        debug!(user_id, "Listing tasks");
        Ok(self.store.lock().tasks.clone())
    }

    async fn list_activities(&self) -> ConnectorResult<Vec<Activity>> {
        self.check(ConnectorOp::ListActivities)?;
        Ok(self.store.lock().activities.clone())
    }

    async fn list_projects(&self) -> ConnectorResult<Vec<Project>> {
        self.check(ConnectorOp::ListProjects)?;
        Ok(self.store.lock().projects.clone())
    }

    async fn start_task(
        &self,
        task: &Task,
        activity: &Activity,
        timestamp: DateTime<Utc>,
        _user_id: &str,
    ) -> ConnectorResult<()> {
        self.check(ConnectorOp::StartTask)?;
        let mut store = self.store.lock();

        if !store.activities.iter().any(|known| known.id == activity.id) {
            return Err(ConnectorError::update(format!("Activity '{}' not found", activity.id)));
        }

        let stored = store.task_mut(&task.id)?;
        if stored.is_running {
            return Err(ConnectorError::update(format!("Task '{}' is already running", task.label)));
        }
        stored.is_running = true;
        stored.last_open_timestamp = Some(timestamp);

        let mut block = TimelineBlock::new(Uuid::new_v4().to_string(), timestamp, timestamp)
            .for_task(task.id.as_str(), activity.id.as_str());
        block.is_active = true;
        store.blocks.push(block);
        Ok(())
    }

    async fn stop_task(
        &self,
        task: &Task,
        timestamp: DateTime<Utc>,
        _user_id: &str,
    ) -> ConnectorResult<()> {
        self.check(ConnectorOp::StopTask)?;
        let mut store = self.store.lock();

        let stored = store.task_mut(&task.id)?;
        if !stored.is_running {
            return Err(ConnectorError::update(format!("Task '{}' is not running", task.label)));
        }
        stored.is_running = false;
        stored.last_open_timestamp = None;

        for block in &mut store.blocks {
            if block.is_active && block.task.as_deref() == Some(task.id.as_str()) {
                block.is_active = false;
                block.end = timestamp.max(block.start);
            }
        }
        store.recompute_total(&task.id);
        Ok(())
    }

    async fn new_task(&self, task: &NewTask) -> ConnectorResult<()> {
        self.check(ConnectorOp::NewTask)?;
        if task.label.trim().is_empty() {
            return Err(ConnectorError::create("Task label is required"));
        }

        let created = task.clone().into_task(Uuid::now_v7().to_string());
        debug!(task_id = %created.id, "Task created");
        self.store.lock().tasks.push(created);
        Ok(())
    }

    async fn list_day_timeline(
        &self,
        date: NaiveDate,
        _tasks: &[Task],
    ) -> ConnectorResult<Vec<TimelineBlock>> {
        self.check(ConnectorOp::ListDayTimeline)?;
        let mut blocks: Vec<TimelineBlock> =
            self.store.lock().blocks.iter().filter(|block| block.day() == date).cloned().collect();
        blocks.sort_by_key(|block| block.start);
        Ok(blocks)
    }

    async fn update_timeline_item(&self, item: &TimelineBlock) -> ConnectorResult<TimelineBlock> {
        self.check(ConnectorOp::UpdateTimelineItem)?;
        if item.end < item.start {
            return Err(ConnectorError::update("Timeline item ends before it starts"));
        }

        let mut store = self.store.lock();
        let stored = store
            .blocks
            .iter_mut()
            .find(|block| block.id == item.id)
            .ok_or_else(|| ConnectorError::update(format!("Timeline item '{}' not found", item.id)))?;

        let previous_task = stored.task.clone();
        stored.start = item.start;
        stored.end = item.end;
        stored.task = item.task.clone();
        stored.activity = item.activity.clone();
        let saved = stored.clone();

        for task_id in [previous_task, saved.task.clone()].into_iter().flatten() {
            store.recompute_total(&task_id);
        }
        Ok(saved)
    }
}
