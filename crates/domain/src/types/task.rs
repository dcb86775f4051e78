//! Task types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{MILLIS_PER_HOUR, TASK_DESCRIPTION_PREVIEW_CHARS};

/// A unit of work time can be booked against
///
/// `last_open_timestamp` is present exactly when `is_running` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Task {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Accumulated booked time, in hours
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_open_timestamp: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self { id: id.into(), label: label.into(), ..Self::default() }
    }

    /// Booked time plus the currently open interval, as of `now`.
    ///
    /// Saturates at `Duration::MIN`/`Duration::MAX` for out-of-range hours.
    pub fn running_total(&self, now: DateTime<Utc>) -> Duration {
        let millis = (self.total_hours * MILLIS_PER_HOUR).floor() as i64;
        let booked = Duration::try_milliseconds(millis)
            .unwrap_or(if millis < 0 { Duration::MIN } else { Duration::MAX });

        match (self.is_running, self.last_open_timestamp) {
            (true, Some(opened)) if now > opened => {
                booked.checked_add(&(now - opened)).unwrap_or(Duration::MAX)
            }
            _ => booked,
        }
    }

    /// Tags with surrounding whitespace removed, blanks skipped
    pub fn display_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.trim()).filter(|tag| !tag.is_empty())
    }

    /// First characters of the description for list rows
    pub fn description_preview(&self) -> &str {
        let description = self.description.as_deref().unwrap_or_default();
        match description.char_indices().nth(TASK_DESCRIPTION_PREVIEW_CHARS) {
            Some((cut, _)) => &description[..cut],
            None => description,
        }
    }

    /// Whether the running flag and open timestamp agree
    pub fn is_consistent(&self) -> bool {
        self.is_running == self.last_open_timestamp.is_some()
    }
}

/// Draft of a task that the backend has not assigned an id to yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct NewTask {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new<L: Into<String>>(label: L) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    /// Materialize the draft under a backend-assigned id
    pub fn into_task<I: Into<String>>(self, id: I) -> Task {
        Task {
            id: id.into(),
            label: self.label,
            description: self.description,
            project: self.project,
            parent_label: self.parent_label,
            tags: self.tags,
            ..Task::default()
        }
    }
}
