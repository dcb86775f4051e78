//! Commands for a presentation layer
//!
//! Commands take ids and plain values, resolve them against the current
//! snapshot and call backend actions. Connector failures land in the
//! backend's error queue; commands only fail on their own for bad input,
//! unknown ids, or when an action reports its queued error back.

pub mod errors;
pub mod session;
pub mod tasks;
pub mod timeline;

pub use errors::{dismiss_error, list_errors, ErrorView};
pub use session::{login, logout, LoginRequest};
pub use tasks::{create_task, list_tasks, refresh, start_task, stop_task, TaskView};
pub use timeline::{edit_timeline_block, select_day};
