//! In-process connector whose failures and timing tests control

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use tickbook_core::Connector;
use tickbook_domain::{
    Activity, AuthCredential, ConnectorError, ConnectorResult, NewTask, Project, Task,
    TimelineBlock, UserProfile,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
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

#[derive(Default)]
struct World {
    projects: Vec<Project>,
    activities: Vec<Activity>,
    tasks: Vec<Task>,
    blocks: Vec<TimelineBlock>,
    next_id: u32,
}

pub struct ScriptedConnector {
    identifier: String,
    secret: String,
    world: Mutex<World>,
    failures: Mutex<HashMap<Op, ConnectorError>>,
    gates: Mutex<HashMap<Op, Arc<Notify>>>,
    calls: Mutex<HashMap<Op, usize>>,
}

impl ScriptedConnector {
    pub fn new(identifier: &str, secret: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
            world: Mutex::new(World::default()),
            failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed(&self, projects: Vec<Project>, activities: Vec<Activity>, tasks: Vec<Task>) {
        let mut world = self.world.lock();
        world.projects = projects;
        world.activities = activities;
        world.tasks = tasks;
    }

    pub fn add_block(&self, block: TimelineBlock) {
        self.world.lock().blocks.push(block);
    }

    pub fn stored_block(&self, id: &str) -> Option<TimelineBlock> {
        self.world.lock().blocks.iter().find(|block| block.id == id).cloned()
    }

    /// Make every call of `op` fail with a copy of `err` until cleared
    pub fn fail(&self, op: Op, err: ConnectorError) {
        self.failures.lock().insert(op, err);
    }

    pub fn clear_failure(&self, op: Op) {
        self.failures.lock().remove(&op);
    }

    /// Calls of `op` block until [`release`](Self::release)
    pub fn hold(&self, op: Op) {
        self.gates.lock().insert(op, Arc::new(Notify::new()));
    }

    pub fn release(&self, op: Op) {
        if let Some(gate) = self.gates.lock().remove(&op) {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    async fn enter(&self, op: Op) -> ConnectorResult<()> {
        *self.calls.lock().entry(op).or_default() += 1;

        let gate = self.gates.lock().get(&op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.failures.lock().get(&op) {
            Some(err) => Err(ConnectorError::new(err.kind(), err.message())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn login(&self, auth: &AuthCredential) -> ConnectorResult<UserProfile> {
        self.enter(Op::Login).await?;
        if auth.identifier != self.identifier || auth.secret != self.secret {
            return Err(ConnectorError::login("Invalid username or password"));
        }
        Ok(UserProfile::new("U-1", "Ada Lovelace")
            .with_field("employee_name", serde_json::json!("EMP-0001")))
    }

    async fn list_tasks(&self, _user_id: &str) -> ConnectorResult<Vec<Task>> {
        self.enter(Op::ListTasks).await?;
        Ok(self.world.lock().tasks.clone())
    }

    async fn list_activities(&self) -> ConnectorResult<Vec<Activity>> {
        self.enter(Op::ListActivities).await?;
        Ok(self.world.lock().activities.clone())
    }

    async fn list_projects(&self) -> ConnectorResult<Vec<Project>> {
        self.enter(Op::ListProjects).await?;
        Ok(self.world.lock().projects.clone())
    }

    async fn start_task(
        &self,
        task: &Task,
        activity: &Activity,
        timestamp: DateTime<Utc>,
        _user_id: &str,
    ) -> ConnectorResult<()> {
        self.enter(Op::StartTask).await?;
        let mut world = self.world.lock();
        world.next_id += 1;
        let block_id = format!("B-{}", world.next_id);

        let stored = world
            .tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| ConnectorError::update("Unknown task"))?;
        stored.is_running = true;
        stored.last_open_timestamp = Some(timestamp);

        let mut block =
            TimelineBlock::new(block_id, timestamp, timestamp).for_task(&task.id, &activity.id);
        block.is_active = true;
        world.blocks.push(block);
        Ok(())
    }

    async fn stop_task(
        &self,
        task: &Task,
        timestamp: DateTime<Utc>,
        _user_id: &str,
    ) -> ConnectorResult<()> {
        self.enter(Op::StopTask).await?;
        let mut world = self.world.lock();

        for block in world.blocks.iter_mut() {
            if block.is_active && block.task.as_deref() == Some(task.id.as_str()) {
                block.is_active = false;
                block.end = timestamp;
            }
        }

        let stored = world
            .tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| ConnectorError::update("Unknown task"))?;
        if let Some(opened) = stored.last_open_timestamp.take() {
            stored.total_hours += (timestamp - opened).num_milliseconds() as f64 / 3_600_000.0;
        }
        stored.is_running = false;
        Ok(())
    }

    async fn new_task(&self, task: &NewTask) -> ConnectorResult<()> {
        self.enter(Op::NewTask).await?;
        let mut world = self.world.lock();
        world.next_id += 1;
        let id = format!("T-{}", world.next_id + 100);
        world.tasks.push(task.clone().into_task(id));
        Ok(())
    }

    async fn list_day_timeline(
        &self,
        date: NaiveDate,
        _tasks: &[Task],
    ) -> ConnectorResult<Vec<TimelineBlock>> {
        self.enter(Op::ListDayTimeline).await?;
        Ok(self.world.lock().blocks.iter().filter(|block| block.day() == date).cloned().collect())
    }

    async fn update_timeline_item(&self, item: &TimelineBlock) -> ConnectorResult<TimelineBlock> {
        self.enter(Op::UpdateTimelineItem).await?;
        let mut world = self.world.lock();
        let stored = world
            .blocks
            .iter_mut()
            .find(|block| block.id == item.id)
            .ok_or_else(|| ConnectorError::update("Unknown timeline item"))?;
        *stored = item.clone();
        Ok(stored.clone())
    }
}
