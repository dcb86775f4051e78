//! Timeline blocks: worked intervals on a given day

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// One worked interval
///
/// The block of the currently running task has `is_active` set; its `end`
/// is advanced locally by the live ticker and only persisted when the task
/// stops or the block is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimelineBlock {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl TimelineBlock {
    pub fn new<I: Into<String>>(id: I, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { id: id.into(), start, end, task: None, activity: None, is_active: false }
    }

    pub fn for_task<T: Into<String>, A: Into<String>>(mut self, task: T, activity: A) -> Self {
        self.task = Some(task.into());
        self.activity = Some(activity.into());
        self
    }

    /// Length of the block; zero when `end` precedes `start`
    pub fn duration(&self) -> Duration {
        (self.end - self.start).max(Duration::zero())
    }

    /// Calendar day (UTC) the block starts on
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}
