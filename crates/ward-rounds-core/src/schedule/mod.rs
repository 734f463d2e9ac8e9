//! Three-tier task schedule: daily rollover, completion tracking, editing.
//!
//! Pipeline per calendar day: Load → Rollover (once) → Toggle/Edit → Store

mod editor;
mod rollover;
mod tracker;

pub use editor::*;
pub use rollover::*;
pub use tracker::*;
