//! Calendar-day and clock-time parsing.
//!
//! Stored records come from several generations of the ward board, so a day
//! may be written as `2025-06-15`, `2025/06/15`, an RFC 3339 timestamp, or the
//! `Sun Jun 15 2025` form the browser board used for its rollover marker.

use chrono::{DateTime, NaiveDate, NaiveTime};

use super::WardError;

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%a %b %d %Y"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Parse a calendar day, discarding any time-of-day component.
pub fn parse_day(input: &str) -> Result<NaiveDate, WardError> {
    let trimmed = input.trim();

    for format in DAY_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(day);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    Err(WardError::InvalidDate(input.to_string()))
}

/// Parse a wall-clock time (`HH:MM` or `HH:MM:SS`).
pub fn parse_time(input: &str) -> Result<NaiveTime, WardError> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| WardError::InvalidDate(input.to_string()))
}

/// Format a day the way it is persisted.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Format a time the way it is shown next to a task.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
