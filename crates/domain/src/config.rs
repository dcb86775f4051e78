//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECTOR_HOST, DEFAULT_TICK_INTERVAL_MS, MEMORY_CONNECTOR_KIND};
use crate::errors::{Result, TickbookError};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connector: ConnectorConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub errors: ErrorQueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.connector.kind.trim().is_empty() {
            return Err(TickbookError::Config("connector.kind must not be empty".into()));
        }
        if self.timeline.tick_interval_ms == 0 {
            return Err(TickbookError::Config(
                "timeline.tick_interval_ms must be greater than zero".into(),
            ));
        }
        if self.errors.auto_dismiss_ms == Some(0) {
            return Err(TickbookError::Config(
                "errors.auto_dismiss_ms must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

/// Backend connector selection
///
/// Exactly one connector is active per process; `kind` names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_connector_kind")]
    pub kind: String,
    #[serde(default = "default_connector_host")]
    pub host: String,
    /// Seed the in-memory connector with a demo account and tasks
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            kind: default_connector_kind(),
            host: default_connector_host(),
            seed_demo: default_seed_demo(),
        }
    }
}

/// Live timeline display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl TimelineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { tick_interval_ms: default_tick_interval_ms() }
    }
}

/// Error queue behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorQueueConfig {
    /// Dismiss queued errors automatically after this many milliseconds.
    /// Errors stay until dismissed by hand when unset.
    #[serde(default)]
    pub auto_dismiss_ms: Option<u64>,
}

impl ErrorQueueConfig {
    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.auto_dismiss_ms.map(Duration::from_millis)
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_connector_kind() -> String {
    MEMORY_CONNECTOR_KIND.to_string()
}

fn default_connector_host() -> String {
    DEFAULT_CONNECTOR_HOST.to_string()
}

fn default_seed_demo() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}
