//! Ward-Rounds daemon
//!
//! Drives the core library on a host: loads configuration, owns the local-day
//! clock and the store, and keeps the ward rolled over while running.

pub mod config;
pub mod ticker;

pub use config::{ConfigError, DaemonConfig};
pub use ticker::RolloverTicker;
