//! Reference data refreshed alongside the task list

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Kind of work a running task is booked against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Activity {
    pub id: String,
    pub label: String,
}

impl Activity {
    pub fn new<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self { id: id.into(), label: label.into() }
    }

    /// Case-insensitive substring match used by activity pickers
    pub fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Project a task belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Project {
    pub id: String,
    pub label: String,
}

impl Project {
    pub fn new<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}
