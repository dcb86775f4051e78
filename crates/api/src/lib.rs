//! # Tickbook App
//!
//! Application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands (presentation layer → backend bridge)
//! - Application context (dependency injection)
//! - Command logging helpers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
