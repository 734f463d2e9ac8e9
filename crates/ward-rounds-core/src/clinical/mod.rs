//! Derived clinical metrics.
//!
//! - [`gestational_age`]: weeks+days from the due date
//! - [`admission_day`]: 1-based hospital day count

mod admission;
mod gestational;

pub use admission::*;
pub use gestational::*;
