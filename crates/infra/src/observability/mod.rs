//! Observability infrastructure
//!
//! Tickbook logs through `tracing`. This module owns the process-wide
//! subscriber; libraries only emit events.

pub mod logging;

pub use logging::{build_filter, init_logging};
