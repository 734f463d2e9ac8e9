//! Tolerant deserializers for stored patient records.
//!
//! A single bad field must never make a whole ward unreadable: malformed
//! values degrade to absent, and the anomaly is logged.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::dates::{parse_day, parse_time};
use super::{FutureTask, ProblemTag, TaskId};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Accept ids written as strings or as numbers.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Free text where `null` means empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional label where `null` and blank both mean absent.
pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .map(RawId::into_string)
        .filter(|value| !value.trim().is_empty()))
}

/// Optional day; unparseable input degrades to `None`.
pub(crate) fn opt_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string);
    Ok(raw.as_deref().and_then(day_or_warn))
}

fn day_or_warn(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_day(raw) {
        Ok(day) => Some(day),
        Err(e) => {
            warn!(error = %e, "ignoring unparseable stored date");
            None
        }
    }
}

/// Selected problem tags; labels outside the vocabulary are dropped.
pub(crate) fn problem_tags<'de, D>(deserializer: D) -> Result<Vec<ProblemTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut tags: Vec<ProblemTag> = Vec::with_capacity(labels.len());
    for label in labels {
        match label.parse::<ProblemTag>() {
            Ok(tag) if !tags.contains(&tag) => tags.push(tag),
            Ok(_) => {}
            Err(_) => warn!(label = %label, "dropping unknown problem tag"),
        }
    }
    Ok(tags)
}

/// Any task list where `null` means empty.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawFutureTask {
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default, deserialize_with = "text")]
    text: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
}

/// Future tasks. An entry whose date is present but unparseable is dropped,
/// never kept as undated.
pub(crate) fn future_tasks<'de, D>(deserializer: D) -> Result<Vec<FutureTask>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawFutureTask>>::deserialize(deserializer)?.unwrap_or_default();
    let mut tasks = Vec::with_capacity(raw.len());

    for item in raw {
        let date = match item.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => match parse_day(value) {
                Ok(day) => Some(day),
                Err(e) => {
                    warn!(error = %e, text = %item.text, "dropping future task with unparseable date");
                    continue;
                }
            },
        };

        let time = match item.time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => parse_time(value)
                .map_err(|e| warn!(error = %e, "ignoring unparseable task time"))
                .ok(),
        };

        tasks.push(FutureTask {
            id: item.id.unwrap_or_else(TaskId::new),
            text: item.text,
            date,
            time,
        });
    }

    Ok(tasks)
}
