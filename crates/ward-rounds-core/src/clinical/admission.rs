//! Hospital day count.

use chrono::NaiveDate;

/// 1-based hospital day: the admission day itself is day 1.
///
/// Returns `None` when no admission date is recorded. A future admission
/// date yields zero or a negative count; callers decide how to show it.
pub fn admission_day(admission_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    admission_date.map(|admitted| (today - admitted).num_days() + 1)
}

/// Board label for the hospital day (`3日目`).
pub fn admission_day_label(admission_date: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    admission_day(admission_date, today).map(|day| format!("{}日目", day))
}
