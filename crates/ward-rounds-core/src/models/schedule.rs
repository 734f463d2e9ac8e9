//! Schedule tier entries.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;

/// Identity of a schedule entry, unique within one patient's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// The browser board used numeric ids; accept both.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::id(deserializer).map(Self)
    }
}

/// An actionable task for today.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodayTask {
    #[serde(default = "TaskId::new")]
    pub id: TaskId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodayTask {
    /// Create an open task with a fresh id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            completed: false,
        }
    }
}

/// A task planned for tomorrow; not yet actionable, so it has no completion flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TomorrowTask {
    #[serde(default = "TaskId::new")]
    pub id: TaskId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
}

impl TomorrowTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
        }
    }
}

/// A task further out. `date = None` means undated: kept until removed by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FutureTask {
    pub id: TaskId,
    pub text: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl FutureTask {
    pub fn new(text: impl Into<String>, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            date,
            time,
        }
    }

    /// Check if this entry stays in the future tier indefinitely.
    pub fn is_undated(&self) -> bool {
        self.date.is_none()
    }
}
