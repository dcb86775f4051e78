//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Error notifications
pub const DEFAULT_ERROR_TIMEOUT_MS: u64 = 5_000;

// Live timeline display
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
pub const TICKER_STOP_TIMEOUT_MS: u64 = 2_000;

// Task presentation
pub const TASK_DESCRIPTION_PREVIEW_CHARS: usize = 140;
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// Connectors
pub const MEMORY_CONNECTOR_KIND: &str = "memory";
pub const DEFAULT_CONNECTOR_HOST: &str = "http://localhost:8000";
