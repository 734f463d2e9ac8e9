//! Domain models for the ward-rounds system.

pub mod dates;
mod lenient;
mod patient;
mod problem;
mod schedule;

pub use dates::{format_day, format_time, parse_day, parse_time};
pub use patient::*;
pub use problem::*;
pub use schedule::*;

use thiserror::Error;

/// Domain errors raised when constructing or parsing values.
///
/// The core operations themselves never return these; they absorb anomalies
/// and degrade their output instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WardError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),
}
