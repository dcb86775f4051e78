//! # Tickbook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (connector capability, clock)
//! - The backend store: canonical state, actions, state distribution
//! - The live timeline ticker and consumer view scopes
//!
//! ## Architecture Principles
//! - Only depends on `tickbook-domain`
//! - No HTTP, storage or platform code
//! - All external dependencies via traits

pub mod backend;
pub mod clock;
pub mod connector;
pub mod scope;
pub mod timeline;

// Re-export specific items to avoid ambiguity
pub use backend::{
    AppState, Backend, BackendBuilder, BackendContext, SessionStatus, StateChannel,
    StateSubscription,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use connector::ports::Connector;
pub use scope::ViewScope;
pub use timeline::{ActiveBlockTicker, TickerConfig, TickerError};
