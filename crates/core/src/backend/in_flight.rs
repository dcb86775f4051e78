//! Per-task in-flight tracking for start/stop
//!
//! A task can have at most one start or stop outstanding. The guard is held
//! until the post-action refresh has landed so a stale `is_running` flag
//! cannot trigger a duplicate call.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Default)]
pub(crate) struct InFlightTasks {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlightTasks {
    /// Claim `task_id`, or `None` if another action already holds it
    pub(crate) fn claim(&self, task_id: &str) -> Option<InFlightGuard> {
        let mut ids = self.ids.lock();
        if !ids.insert(task_id.to_string()) {
            return None;
        }
        Some(InFlightGuard { ids: Arc::clone(&self.ids), task_id: task_id.to_string() })
    }

    pub(crate) fn contains(&self, task_id: &str) -> bool {
        self.ids.lock().contains(task_id)
    }
}

/// Releases the claim on drop
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    ids: Arc<Mutex<HashSet<String>>>,
    task_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.task_id);
    }
}
