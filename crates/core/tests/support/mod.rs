//! Shared helpers for backend integration tests
#![allow(dead_code)]

pub mod connector;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tickbook_core::{Backend, ManualClock};
use tickbook_domain::{Activity, AuthCredential, Project, Task};

pub use connector::{Op, ScriptedConnector};

/// 2024-05-06 09:00 UTC
pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
}

pub fn credential() -> AuthCredential {
    AuthCredential::new("ada", "s3cret", "https://tickbook.test")
}

/// Connector seeded with one user, two projects, two activities, two tasks
pub fn seeded_connector() -> Arc<ScriptedConnector> {
    let connector = ScriptedConnector::new("ada", "s3cret");
    connector.seed(
        vec![Project::new("P-1", "Internal"), Project::new("P-2", "Client")],
        vec![Activity::new("A-1", "Development"), Activity::new("A-2", "Meetings")],
        vec![Task::new("T-1", "Write report"), Task::new("T-2", "Review code")],
    );
    Arc::new(connector)
}

pub struct Harness {
    pub backend: Backend,
    pub connector: Arc<ScriptedConnector>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_connector(seeded_connector())
    }

    pub fn with_connector(connector: Arc<ScriptedConnector>) -> Self {
        let clock = Arc::new(ManualClock::new(nine_am()));
        let backend = Backend::builder(connector.clone()).clock(clock.clone()).build();
        Self { backend, connector, clock }
    }

    /// Logged in with lists loaded
    pub async fn logged_in() -> Self {
        let harness = Self::new();
        harness.backend.login(credential()).await.expect("login succeeds");
        harness.backend.list_tasks().await;
        harness
    }

    pub fn task(&self, id: &str) -> Task {
        self.backend.snapshot().find_task(id).cloned().expect("task is loaded")
    }

    pub fn activity(&self, id: &str) -> Activity {
        self.backend.snapshot().find_activity(id).cloned().expect("activity is loaded")
    }

    /// Yield until `op` has been called `count` times
    pub async fn wait_for_calls(&self, op: Op, count: usize) {
        for _ in 0..1_000 {
            if self.connector.calls(op) >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("{op:?} was not called {count} times");
    }
}
