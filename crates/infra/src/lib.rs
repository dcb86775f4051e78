//! # Tickbook Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment, JSON/TOML files)
//! - Logging initialisation
//! - Backend connectors (in-memory)
//!
//! ## Architecture
//! - Implements traits defined in `tickbook-core`
//! - Contains all "impure" code (I/O, process environment, global
//!   subscribers)

pub mod config;
pub mod connectors;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use connectors::{build_connector, ConnectorOp, MemoryConnector};
pub use errors::InfraError;
