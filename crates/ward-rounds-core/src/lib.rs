//! Ward-Rounds Core Library
//!
//! Local-first obstetric ward board: patients, a rolling three-tier task
//! schedule, and derived clinical metrics.
//!
//! # Architecture
//!
//! ```text
//!          Host app / daemon (owns the clock and the store)
//!                               │
//!               load ──────────►│◄────────── tick (≤ 60 s)
//!                               ▼
//!                  ┌─────────────────────────┐
//!                  │   Schedule rollover     │  once per calendar day
//!                  │ today ← left + tomorrow │
//!                  │ tomorrow ← future(D+1)  │
//!                  │ BP shift, D ← today     │
//!                  └────────────┬────────────┘
//!                               │
//!             ┌─────────────────┼─────────────────┐
//!             ▼                 ▼                 ▼
//!        Toggle / edit     Sort for board    GA / hospital day
//!             │                                   problem list
//!             ▼
//!          Store (SQLite, whole-record JSON)
//! ```
//!
//! # Core Principle
//!
//! **Core operations are total.** Malformed dates, unknown ids and missing
//! fields degrade the output (`Unknown` age, no-op toggle) instead of failing.
//! The core never reads the wall clock; "today" is always an argument.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, schedule tiers, problem vocabulary)
//! - [`clinical`]: Gestational age and hospital day
//! - [`problems`]: Problem list display
//! - [`sort`]: Board ordering
//! - [`schedule`]: Rollover engine, completion toggle, schedule editing
//! - [`db`]: SQLite patient store
//! - [`clock`]: Sources of "today" for hosts

pub mod clinical;
pub mod clock;
pub mod db;
pub mod models;
pub mod problems;
pub mod schedule;
pub mod sort;

// Re-export commonly used types
pub use clinical::{admission_day, gestational_age, GestationalAge};
pub use clock::{Clock, FixedClock, LocalClock};
pub use db::Database;
pub use models::{FutureTask, Patient, ProblemTag, TaskId, TodayTask, TomorrowTask, WardError};
pub use problems::combine_problems;
pub use schedule::{
    rollover, rollover_all, toggle_task_completion, RolloverReport, ToggleOutcome,
};
pub use sort::{sort_patients, SortMode};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WardRoundsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for WardRoundsError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => WardRoundsError::NotFound(what),
            db::DbError::Json(e) => WardRoundsError::SerializationError(e.to_string()),
            other => WardRoundsError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WardRoundsError {
    fn from(e: serde_json::Error) -> Self {
        WardRoundsError::SerializationError(e.to_string())
    }
}

impl From<WardError> for WardRoundsError {
    fn from(e: WardError) -> Self {
        match e {
            WardError::NotFound(what) => WardRoundsError::NotFound(what),
            other => WardRoundsError::InvalidInput(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for WardRoundsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WardRoundsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_opt_day(value: Option<String>) -> Result<Option<NaiveDate>, WardError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(day) => models::parse_day(day).map(Some),
    }
}

fn parse_opt_time(value: Option<String>) -> Result<Option<chrono::NaiveTime>, WardError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(time) => models::parse_time(time).map(Some),
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<WardRoundsCore>, WardRoundsError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(WardRoundsCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<WardRoundsCore>, WardRoundsError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(WardRoundsCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Display Helpers (exported to FFI)
// =========================================================================

/// Gestational age label (`36週2日`, `未妊娠`, `産後`, `-`) on the given day.
#[uniffi::export]
pub fn gestational_age_label(due_date: Option<String>, on: String) -> Result<String, WardRoundsError> {
    let on = models::parse_day(&on)?;
    // A malformed due date shows as unknown rather than failing the board.
    let due = parse_opt_day(due_date).unwrap_or(None);
    Ok(gestational_age(due, on).to_string())
}

/// Hospital day label (`3日目`), `None` without an admission date.
#[uniffi::export]
pub fn admission_day_label(
    admission_date: Option<String>,
    today: String,
) -> Result<Option<String>, WardRoundsError> {
    let today = models::parse_day(&today)?;
    let admitted = parse_opt_day(admission_date).unwrap_or(None);
    Ok(clinical::admission_day_label(admitted, today))
}

/// `#`-prefixed problem list. Unknown labels in `selected` are ignored.
#[uniffi::export]
pub fn combine_problem_list(selected: Vec<String>, free_text: String) -> Vec<String> {
    let tags: Vec<ProblemTag> = selected.iter().filter_map(|s| s.parse().ok()).collect();
    combine_problems(&tags, &free_text)
}

/// The canonical problem vocabulary, in selection order.
#[uniffi::export]
pub fn problem_vocabulary() -> Vec<String> {
    ProblemTag::ALL.iter().map(|t| t.label().to_string()).collect()
}

/// One-tap task presets.
#[uniffi::export]
pub fn quick_tasks() -> Vec<String> {
    schedule::QUICK_TASKS.iter().map(|t| t.to_string()).collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct WardRoundsCore {
    db: Arc<Mutex<Database>>,
}

impl WardRoundsCore {
    /// Load a patient, apply `edit`, and store it back.
    fn edit_patient<R>(
        &self,
        patient_id: &str,
        edit: impl FnOnce(&mut Patient) -> R,
    ) -> Result<R, WardRoundsError> {
        let db = self.db.lock()?;
        let mut patient = db.require_patient(patient_id)?;
        let result = edit(&mut patient);
        db.update_patient(&patient)?;
        Ok(result)
    }
}

#[uniffi::export]
impl WardRoundsCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient. `today` becomes her first rollover day.
    pub fn create_patient(
        &self,
        name: String,
        due_date: String,
        today: String,
    ) -> Result<FfiPatient, WardRoundsError> {
        let due_date = parse_opt_day(Some(due_date))?;
        let today = models::parse_day(&today)?;
        let patient = Patient::new(name, due_date, today)?;

        let db = self.db.lock()?;
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Save an edited patient record.
    pub fn update_patient(&self, patient: FfiPatient) -> Result<bool, WardRoundsError> {
        let patient = Patient::try_from(patient)?;
        let db = self.db.lock()?;
        Ok(db.update_patient(&patient)?)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, WardRoundsError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: String) -> Result<bool, WardRoundsError> {
        let db = self.db.lock()?;
        Ok(db.delete_patient(&id)?)
    }

    /// List patients in board order.
    pub fn list_patients(&self, mode: FfiSortMode) -> Result<Vec<FfiPatient>, WardRoundsError> {
        let db = self.db.lock()?;
        let patients = db.list_patients()?;
        Ok(sort_patients(&patients, mode.into())
            .into_iter()
            .map(|p| p.clone().into())
            .collect())
    }

    /// Select or deselect a canonical problem. Returns the new selection.
    pub fn toggle_problem(
        &self,
        patient_id: String,
        label: String,
    ) -> Result<Vec<String>, WardRoundsError> {
        let tag: ProblemTag = label.parse()?;
        self.edit_patient(&patient_id, |p| {
            p.toggle_problem(tag);
            p.selected_problems
                .iter()
                .map(|t| t.label().to_string())
                .collect()
        })
    }

    // =========================================================================
    // Schedule Operations
    // =========================================================================

    /// Roll every stored patient over to `today`. Safe to call repeatedly.
    pub fn rollover_all(&self, today: String) -> Result<FfiRolloverReport, WardRoundsError> {
        let today = models::parse_day(&today)?;
        let mut db = self.db.lock()?;
        let report = db.rollover_stored_patients(today)?;
        Ok(report.into())
    }

    /// Flip completion of one of today's tasks.
    pub fn toggle_task(
        &self,
        patient_id: String,
        task_id: String,
    ) -> Result<FfiToggleOutcome, WardRoundsError> {
        let db = self.db.lock()?;
        let Some(mut patient) = db.get_patient(&patient_id)? else {
            return Ok(FfiToggleOutcome::PatientNotFound);
        };
        match patient.toggle_today_task(&TaskId::from(task_id)) {
            Some(completed) => {
                db.update_patient(&patient)?;
                Ok(FfiToggleOutcome::Toggled { completed })
            }
            None => Ok(FfiToggleOutcome::TaskNotFound),
        }
    }

    /// Add a task to a tier. `date` only applies to the future tier.
    /// Returns the new task id, `None` for blank text.
    pub fn add_task(
        &self,
        patient_id: String,
        tier: FfiTier,
        text: String,
        date: Option<String>,
        time: Option<String>,
    ) -> Result<Option<String>, WardRoundsError> {
        let date = parse_opt_day(date)?;
        let time = parse_opt_time(time)?;
        let id = self.edit_patient(&patient_id, |p| match tier {
            FfiTier::Today => p.add_today_task(&text, time),
            FfiTier::Tomorrow => p.add_tomorrow_task(&text, time),
            FfiTier::Future => p.add_future_task(&text, date, time),
        })?;
        Ok(id.map(|id| id.to_string()))
    }

    /// Add a quick preset to a tier. Future-tier presets need a date.
    pub fn add_quick_task(
        &self,
        patient_id: String,
        tier: FfiTier,
        preset: String,
        date: Option<String>,
        time: Option<String>,
    ) -> Result<Option<String>, WardRoundsError> {
        let date = parse_opt_day(date)?;
        let time = parse_opt_time(time)?;
        if matches!(tier, FfiTier::Future) && date.is_none() {
            return Err(WardError::MissingRequiredField("date").into());
        }
        let id = self.edit_patient(&patient_id, |p| match (tier, date) {
            (FfiTier::Today, _) => p.add_today_task(&preset, time),
            (FfiTier::Tomorrow, _) => p.add_tomorrow_task(&preset, time),
            (FfiTier::Future, Some(date)) => p.add_quick_future_task(&preset, date, time),
            (FfiTier::Future, None) => None,
        })?;
        Ok(id.map(|id| id.to_string()))
    }

    /// Remove a task from a tier. Returns `false` if no such task.
    pub fn remove_task(
        &self,
        patient_id: String,
        tier: FfiTier,
        task_id: String,
    ) -> Result<bool, WardRoundsError> {
        let task_id = TaskId::from(task_id);
        self.edit_patient(&patient_id, |p| match tier {
            FfiTier::Today => p.remove_today_task(&task_id),
            FfiTier::Tomorrow => p.remove_tomorrow_task(&task_id),
            FfiTier::Future => p.remove_future_task(&task_id),
        })
    }

    /// Every today task on the ward.
    pub fn today_task_board(&self) -> Result<Vec<FfiBoardEntry>, WardRoundsError> {
        let db = self.db.lock()?;
        let patients = db.list_patients()?;
        Ok(schedule::today_task_board(&patients)
            .into_iter()
            .map(|entry| FfiBoardEntry {
                patient_id: entry.patient_id.to_string(),
                patient_name: entry.patient_name.to_string(),
                task: entry.task.clone().into(),
            })
            .collect())
    }

    // =========================================================================
    // Import / Export
    // =========================================================================

    /// Import a JSON array of patient records. Returns how many were read.
    pub fn import_json(&self, json: String) -> Result<u32, WardRoundsError> {
        let mut db = self.db.lock()?;
        Ok(db.import_patients_json(&json)? as u32)
    }

    /// Export the ward as JSON.
    pub fn export_json(&self) -> Result<String, WardRoundsError> {
        let db = self.db.lock()?;
        Ok(db.export_patients_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe board ordering.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiSortMode {
    Registration,
    ByPhysician,
    ByRoom,
    ByGestationalWeeks,
}

impl From<FfiSortMode> for SortMode {
    fn from(mode: FfiSortMode) -> Self {
        match mode {
            FfiSortMode::Registration => SortMode::Registration,
            FfiSortMode::ByPhysician => SortMode::ByPhysician,
            FfiSortMode::ByRoom => SortMode::ByRoom,
            FfiSortMode::ByGestationalWeeks => SortMode::ByGestationalWeeks,
        }
    }
}

/// FFI-safe schedule tier.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiTier {
    Today,
    Tomorrow,
    Future,
}

/// FFI-safe toggle result.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiToggleOutcome {
    Toggled { completed: bool },
    PatientNotFound,
    TaskNotFound,
}

/// FFI-safe today task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTodayTask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl From<TodayTask> for FfiTodayTask {
    fn from(task: TodayTask) -> Self {
        Self {
            id: task.id.to_string(),
            text: task.text,
            completed: task.completed,
        }
    }
}

/// FFI-safe tomorrow task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTomorrowTask {
    pub id: String,
    pub text: String,
}

/// FFI-safe future task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFutureTask {
    pub id: String,
    pub text: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub patient_number: Option<String>,
    pub room: Option<String>,
    pub physician: Option<String>,
    pub due_date: Option<String>,
    pub admission_date: Option<String>,
    pub today_bp: String,
    pub yesterday_bp: String,
    pub subjective: String,
    pub selected_problems: Vec<String>,
    pub free_text_problems: String,
    pub today_tasks: Vec<FfiTodayTask>,
    pub tomorrow_tasks: Vec<FfiTomorrowTask>,
    pub future_tasks: Vec<FfiFutureTask>,
    pub last_rollover_date: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            patient_number: patient.patient_number,
            room: patient.room,
            physician: patient.physician,
            due_date: patient.due_date.map(models::format_day),
            admission_date: patient.admission_date.map(models::format_day),
            today_bp: patient.today_bp,
            yesterday_bp: patient.yesterday_bp,
            subjective: patient.subjective,
            selected_problems: patient
                .selected_problems
                .iter()
                .map(|t| t.label().to_string())
                .collect(),
            free_text_problems: patient.free_text_problems,
            today_tasks: patient.today_tasks.into_iter().map(|t| t.into()).collect(),
            tomorrow_tasks: patient
                .tomorrow_tasks
                .into_iter()
                .map(|t| FfiTomorrowTask {
                    id: t.id.to_string(),
                    text: t.text,
                })
                .collect(),
            future_tasks: patient
                .future_tasks
                .into_iter()
                .map(|t| FfiFutureTask {
                    id: t.id.to_string(),
                    text: t.text,
                    date: t.date.map(models::format_day),
                    time: t.time.map(models::format_time),
                })
                .collect(),
            last_rollover_date: patient.last_rollover_date.map(models::format_day),
        }
    }
}

impl TryFrom<FfiPatient> for Patient {
    type Error = WardError;

    fn try_from(patient: FfiPatient) -> Result<Self, Self::Error> {
        if patient.name.trim().is_empty() {
            return Err(WardError::MissingRequiredField("name"));
        }

        let selected_problems = patient
            .selected_problems
            .iter()
            .map(|label| label.parse())
            .collect::<Result<Vec<ProblemTag>, _>>()?;

        let future_tasks = patient
            .future_tasks
            .into_iter()
            .map(|t| {
                Ok(FutureTask {
                    id: TaskId::from(t.id),
                    text: t.text,
                    date: parse_opt_day(t.date)?,
                    time: parse_opt_time(t.time)?,
                })
            })
            .collect::<Result<Vec<_>, WardError>>()?;

        Ok(Patient {
            id: patient.id,
            name: patient.name,
            patient_number: patient.patient_number,
            room: patient.room,
            physician: patient.physician,
            due_date: parse_opt_day(patient.due_date)?,
            admission_date: parse_opt_day(patient.admission_date)?,
            today_bp: patient.today_bp,
            yesterday_bp: patient.yesterday_bp,
            subjective: patient.subjective,
            selected_problems,
            free_text_problems: patient.free_text_problems,
            today_tasks: patient
                .today_tasks
                .into_iter()
                .map(|t| TodayTask {
                    id: TaskId::from(t.id),
                    text: t.text,
                    completed: t.completed,
                })
                .collect(),
            tomorrow_tasks: patient
                .tomorrow_tasks
                .into_iter()
                .map(|t| TomorrowTask {
                    id: TaskId::from(t.id),
                    text: t.text,
                })
                .collect(),
            future_tasks,
            last_rollover_date: parse_opt_day(patient.last_rollover_date)?,
        })
    }
}

/// FFI-safe board row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBoardEntry {
    pub patient_id: String,
    pub patient_name: String,
    pub task: FfiTodayTask,
}

/// FFI-safe rollover summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRolloverReport {
    pub rolled: u32,
    pub unchanged: u32,
    pub carried_over: u32,
    pub promoted: u32,
    pub due_today: u32,
    pub due_tomorrow: u32,
    pub dropped: u32,
}

impl From<RolloverReport> for FfiRolloverReport {
    fn from(report: RolloverReport) -> Self {
        Self {
            rolled: report.rolled as u32,
            unchanged: report.unchanged as u32,
            carried_over: report.carried_over as u32,
            promoted: report.promoted as u32,
            due_today: report.due_today as u32,
            due_tomorrow: report.due_tomorrow as u32,
            dropped: report.dropped as u32,
        }
    }
}
