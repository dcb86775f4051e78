//! # Tickbook Domain
//!
//! Business domain types and models for Tickbook.
//!
//! This crate contains:
//! - Domain data types (Task, TimelineBlock, UserProfile, etc.)
//! - The connector error taxonomy and the workspace error type
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Tickbook crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
