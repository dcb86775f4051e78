//! Live timeline support

pub mod error;
pub mod ticker;

pub use error::{TickerError, TickerResult};
pub use ticker::{ActiveBlockTicker, TickerConfig};
