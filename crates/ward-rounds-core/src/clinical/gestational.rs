//! Gestational age from the estimated due date.
//!
//! Dating follows Naegele's rule: the due date sits 280 days (40+0 weeks)
//! after the conception reference point, so the reference is recovered by
//! stepping back 280 days and counting whole calendar days forward.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days from the conception reference point to the due date.
pub const TERM_DAYS: i64 = 280;

/// Last completed week still reported as a gestational age.
pub const MAX_REPORTED_WEEKS: i64 = 42;

/// Gestational age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestationalAge {
    /// No due date recorded
    Unknown,
    /// Reference day falls before the conception reference point
    PreConception,
    /// More than 42 completed weeks: the pregnancy has ended
    PostpartumOverdue,
    /// Completed weeks plus remainder days
    Weeks { weeks: u32, days: u32 },
}

impl fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestationalAge::Unknown => f.write_str("-"),
            GestationalAge::PreConception => f.write_str("未妊娠"),
            GestationalAge::PostpartumOverdue => f.write_str("産後"),
            GestationalAge::Weeks { weeks, days } => write!(f, "{}週{}日", weeks, days),
        }
    }
}

/// The conception reference point for a due date, `None` when it falls
/// outside the representable calendar.
pub fn conception_reference(due_date: NaiveDate) -> Option<NaiveDate> {
    due_date.checked_sub_signed(chrono::Duration::days(TERM_DAYS))
}

/// Whole calendar days elapsed since the conception reference point.
pub fn elapsed_days(due_date: NaiveDate, on: NaiveDate) -> Option<i64> {
    conception_reference(due_date).map(|reference| (on - reference).num_days())
}

/// Classify the gestational age on a given day.
pub fn gestational_age(due_date: Option<NaiveDate>, on: NaiveDate) -> GestationalAge {
    let Some(due_date) = due_date else {
        return GestationalAge::Unknown;
    };

    let Some(elapsed) = elapsed_days(due_date, on) else {
        return GestationalAge::Unknown;
    };
    let weeks = elapsed.div_euclid(7);
    if weeks < 0 {
        return GestationalAge::PreConception;
    }
    if weeks > MAX_REPORTED_WEEKS {
        return GestationalAge::PostpartumOverdue;
    }

    GestationalAge::Weeks {
        weeks: weeks as u32,
        days: elapsed.rem_euclid(7) as u32,
    }
}
