//! Backend connector capability

pub mod ports;

pub use ports::Connector;
