//! Daily schedule rollover.
//!
//! Each patient is in state `Fresh(D)` where `D = last_rollover_date`. When the
//! supplied day is later than `D` (or `D` is unknown) the schedule advances
//! once:
//!
//! ```text
//!   today    ← unfinished(today) ++ tomorrow ++ future[date == today]
//!   tomorrow ← future[date == today + 1]
//!   future   ← future[undated] ++ future[date > today + 1]
//!   BP       ← shifted (only if D was known)
//!   D        ← today
//! ```
//!
//! The transition runs once per call no matter how many days were missed.
//! Items dated on a skipped day fall out of the future tier without being
//! surfaced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{FutureTask, Patient, TodayTask, TomorrowTask};

/// What happened to one patient's schedule during a rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverStats {
    /// Unfinished items carried over from the old today list
    pub carried_over: usize,
    /// Items promoted from the old tomorrow list
    pub promoted: usize,
    /// Future items that became due today
    pub due_today: usize,
    /// Future items moved into the tomorrow list
    pub due_tomorrow: usize,
    /// Stale dated future items discarded
    pub dropped: usize,
    /// Whether the blood pressure readings were shifted
    pub bp_shifted: bool,
}

/// Summary of a rollover pass over a whole ward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverReport {
    /// Patients whose schedule advanced
    pub rolled: usize,
    /// Patients already current (or ahead of the supplied day)
    pub unchanged: usize,
    pub carried_over: usize,
    pub promoted: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    pub dropped: usize,
}

impl RolloverReport {
    fn record(&mut self, stats: Option<RolloverStats>) {
        match stats {
            None => self.unchanged += 1,
            Some(stats) => {
                self.rolled += 1;
                self.carried_over += stats.carried_over;
                self.promoted += stats.promoted;
                self.due_today += stats.due_today;
                self.due_tomorrow += stats.due_tomorrow;
                self.dropped += stats.dropped;
            }
        }
    }
}

/// Check whether a rollover to `today` would change this patient.
pub fn needs_rollover(patient: &Patient, today: NaiveDate) -> bool {
    match patient.last_rollover_date {
        None => true,
        Some(last) => last < today,
    }
}

/// Advance a patient's schedule to `today`. Idempotent within a day.
pub fn rollover(patient: &Patient, today: NaiveDate) -> Patient {
    rollover_with_stats(patient, today).0
}

/// Like [`rollover`], also reporting what moved. Stats are `None` when the
/// patient was left unchanged.
pub fn rollover_with_stats(patient: &Patient, today: NaiveDate) -> (Patient, Option<RolloverStats>) {
    if let Some(last) = patient.last_rollover_date {
        if last > today {
            warn!(
                patient = %patient.id,
                last_rollover = %last,
                today = %today,
                "supplied day is before the last rollover; leaving schedule unchanged"
            );
        }
        if last >= today {
            return (patient.clone(), None);
        }
    }

    let (next, stats) = advance(patient, today);
    debug!(
        patient = %patient.id,
        today = %today,
        carried_over = stats.carried_over,
        promoted = stats.promoted,
        due_today = stats.due_today,
        due_tomorrow = stats.due_tomorrow,
        dropped = stats.dropped,
        "rolled over schedule"
    );
    (next, Some(stats))
}

/// Roll every patient over to `today`.
pub fn rollover_all(patients: &[Patient], today: NaiveDate) -> Vec<Patient> {
    rollover_all_with_report(patients, today).0
}

/// Roll every patient over to `today`, summarising the pass.
pub fn rollover_all_with_report(patients: &[Patient], today: NaiveDate) -> (Vec<Patient>, RolloverReport) {
    let mut report = RolloverReport::default();
    let rolled: Vec<Patient> = patients
        .iter()
        .map(|patient| {
            let (next, stats) = rollover_with_stats(patient, today);
            report.record(stats);
            next
        })
        .collect();

    if report.rolled > 0 {
        info!(
            today = %today,
            rolled = report.rolled,
            unchanged = report.unchanged,
            dropped = report.dropped,
            "ward schedule rollover"
        );
    }
    (rolled, report)
}

fn advance(patient: &Patient, today: NaiveDate) -> (Patient, RolloverStats) {
    let tomorrow = today.succ_opt();
    let mut stats = RolloverStats::default();

    let mut today_tasks: Vec<TodayTask> = patient
        .today_tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| TodayTask::new(task.text.clone()))
        .collect();
    stats.carried_over = today_tasks.len();

    today_tasks.extend(
        patient
            .tomorrow_tasks
            .iter()
            .map(|task| TodayTask::new(task.text.clone())),
    );
    stats.promoted = patient.tomorrow_tasks.len();

    let mut tomorrow_tasks = Vec::new();
    let mut future_tasks: Vec<FutureTask> = Vec::new();

    for item in &patient.future_tasks {
        match item.date {
            None => future_tasks.push(item.clone()),
            Some(date) if date == today => {
                today_tasks.push(TodayTask::new(item.text.clone()));
                stats.due_today += 1;
            }
            Some(date) if Some(date) == tomorrow => {
                tomorrow_tasks.push(TomorrowTask::new(item.text.clone()));
                stats.due_tomorrow += 1;
            }
            Some(date) if tomorrow.is_some_and(|t| date > t) => future_tasks.push(item.clone()),
            Some(_) => stats.dropped += 1,
        }
    }

    let mut next = patient.clone();
    next.today_tasks = today_tasks;
    next.tomorrow_tasks = tomorrow_tasks;
    next.future_tasks = future_tasks;

    // A freshly created patient has no previous day to shift from.
    if patient.last_rollover_date.is_some() {
        next.yesterday_bp = std::mem::take(&mut next.today_bp);
        stats.bp_shifted = true;
    }
    next.last_rollover_date = Some(today);

    (next, stats)
}
