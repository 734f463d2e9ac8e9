//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{lenient, FutureTask, ProblemTag, TaskId, TodayTask, TomorrowTask, WardError};

/// An admitted obstetric patient with her three-tier task schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Local id - always present, generated locally
    #[serde(default = "new_patient_id", deserialize_with = "lenient::id")]
    pub id: String,
    /// Patient name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Hospital patient identifier
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub patient_number: Option<String>,
    /// Room label (usually numeric, e.g. "301")
    #[serde(default, alias = "roomNumber", deserialize_with = "lenient::opt_text")]
    pub room: Option<String>,
    /// Attending physician
    #[serde(default, alias = "doctor", deserialize_with = "lenient::opt_text")]
    pub physician: Option<String>,
    /// Estimated delivery date
    #[serde(default, alias = "edd", deserialize_with = "lenient::opt_day")]
    pub due_date: Option<NaiveDate>,
    /// Admission date
    #[serde(default, deserialize_with = "lenient::opt_day")]
    pub admission_date: Option<NaiveDate>,
    /// Today's blood pressure reading
    #[serde(default, alias = "todayBP", deserialize_with = "lenient::text")]
    pub today_bp: String,
    /// Yesterday's blood pressure reading
    #[serde(default, alias = "yesterdayBP", deserialize_with = "lenient::text")]
    pub yesterday_bp: String,
    /// Subjective note (patient complaints)
    #[serde(default, deserialize_with = "lenient::text")]
    pub subjective: String,
    /// Selected canonical problems, in selection order
    #[serde(default, deserialize_with = "lenient::problem_tags")]
    pub selected_problems: Vec<ProblemTag>,
    /// Free-text problems, one per line
    #[serde(default, deserialize_with = "lenient::text")]
    pub free_text_problems: String,
    #[serde(default, alias = "todaySchedule", deserialize_with = "lenient::list")]
    pub today_tasks: Vec<TodayTask>,
    #[serde(default, alias = "tomorrowSchedule", deserialize_with = "lenient::list")]
    pub tomorrow_tasks: Vec<TomorrowTask>,
    #[serde(
        default,
        alias = "futureScheduleItems",
        deserialize_with = "lenient::future_tasks"
    )]
    pub future_tasks: Vec<FutureTask>,
    /// Last day the schedule was rolled over
    #[serde(default, alias = "lastUpdateDate", deserialize_with = "lenient::opt_day")]
    pub last_rollover_date: Option<NaiveDate>,
}

fn new_patient_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Patient {
    /// Create a new patient with required fields.
    ///
    /// The schedule starts empty and is considered rolled over on `today`,
    /// so the first rollover only happens at the next day boundary.
    pub fn new(name: String, due_date: Option<NaiveDate>, today: NaiveDate) -> Result<Self, WardError> {
        if name.trim().is_empty() {
            return Err(WardError::MissingRequiredField("name"));
        }
        let due_date = due_date.ok_or(WardError::MissingRequiredField("due_date"))?;

        Ok(Self {
            id: new_patient_id(),
            name,
            patient_number: None,
            room: None,
            physician: None,
            due_date: Some(due_date),
            admission_date: None,
            today_bp: String::new(),
            yesterday_bp: String::new(),
            subjective: String::new(),
            selected_problems: Vec::new(),
            free_text_problems: String::new(),
            today_tasks: Vec::new(),
            tomorrow_tasks: Vec::new(),
            future_tasks: Vec::new(),
            last_rollover_date: Some(today),
        })
    }

    /// Select a problem if absent, deselect it if present.
    pub fn toggle_problem(&mut self, tag: ProblemTag) {
        if let Some(pos) = self.selected_problems.iter().position(|t| *t == tag) {
            self.selected_problems.remove(pos);
        } else {
            self.selected_problems.push(tag);
        }
    }

    /// Check whether a task id is used anywhere in this patient's schedule.
    pub fn has_task(&self, id: &TaskId) -> bool {
        self.today_tasks.iter().any(|t| &t.id == id)
            || self.tomorrow_tasks.iter().any(|t| &t.id == id)
            || self.future_tasks.iter().any(|t| &t.id == id)
    }

    /// Give every colliding task id a fresh one so that id-based operations
    /// stay unambiguous. Returns how many ids were replaced.
    pub fn repair_task_ids(&mut self) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut replaced = 0;

        let ids = self
            .today_tasks
            .iter_mut()
            .map(|t| &mut t.id)
            .chain(self.tomorrow_tasks.iter_mut().map(|t| &mut t.id))
            .chain(self.future_tasks.iter_mut().map(|t| &mut t.id));

        for id in ids {
            if !seen.insert(id.clone()) {
                *id = TaskId::new();
                seen.insert(id.clone());
                replaced += 1;
            }
        }

        if replaced > 0 {
            warn!(patient = %self.id, replaced, "replaced duplicate task ids");
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("山田花子".into(), Some(day(2025, 6, 15)), day(2025, 5, 1)).unwrap();
        assert_eq!(patient.name, "山田花子");
        assert_eq!(patient.last_rollover_date, Some(day(2025, 5, 1)));
        assert!(patient.today_tasks.is_empty());
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_new_patient_requires_name_and_due_date() {
        assert!(matches!(
            Patient::new("  ".into(), Some(day(2025, 6, 15)), day(2025, 5, 1)),
            Err(WardError::MissingRequiredField("name"))
        ));
        assert!(matches!(
            Patient::new("山田花子".into(), None, day(2025, 5, 1)),
            Err(WardError::MissingRequiredField("due_date"))
        ));
    }

    #[test]
    fn test_toggle_problem() {
        let mut patient = Patient::new("A".into(), Some(day(2025, 6, 15)), day(2025, 5, 1)).unwrap();
        patient.toggle_problem(ProblemTag::PlacentaPrevia);
        patient.toggle_problem(ProblemTag::GestationalDiabetes);
        assert_eq!(
            patient.selected_problems,
            vec![ProblemTag::PlacentaPrevia, ProblemTag::GestationalDiabetes]
        );

        patient.toggle_problem(ProblemTag::PlacentaPrevia);
        assert_eq!(patient.selected_problems, vec![ProblemTag::GestationalDiabetes]);
    }

    #[test]
    fn test_legacy_record_loads() {
        let json = r#"{
            "id": 1718000000000,
            "name": "佐藤",
            "roomNumber": "302",
            "doctor": "田中",
            "edd": "2025-06-15",
            "admissionDate": "",
            "todayBP": "120/80",
            "yesterdayBP": null,
            "selectedProblems": ["切迫早産", "つわり"],
            "todaySchedule": [{"text": "NST", "completed": false, "id": 1718000000001.2}],
            "tomorrowSchedule": [],
            "futureScheduleItems": [
                {"id": 1, "date": null, "text": "IC", "time": ""},
                {"id": 2, "date": "garbage", "text": "lost", "time": ""},
                {"id": 3, "date": "2025-06-20", "text": "帝王切開 (09:00)", "time": "09:00"}
            ],
            "lastUpdateDate": "Sun Jun 01 2025"
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id, "1718000000000");
        assert_eq!(patient.room.as_deref(), Some("302"));
        assert_eq!(patient.physician.as_deref(), Some("田中"));
        assert_eq!(patient.due_date, Some(day(2025, 6, 15)));
        assert_eq!(patient.admission_date, None);
        assert_eq!(patient.yesterday_bp, "");
        assert_eq!(patient.selected_problems, vec![ProblemTag::ThreatenedPretermLabor]);
        assert_eq!(patient.today_tasks.len(), 1);
        assert_eq!(patient.future_tasks.len(), 2);
        assert!(patient.future_tasks[0].is_undated());
        assert_eq!(patient.future_tasks[1].date, Some(day(2025, 6, 20)));
        assert_eq!(patient.last_rollover_date, Some(day(2025, 6, 1)));
    }

    #[test]
    fn test_malformed_due_date_degrades_to_absent() {
        let patient: Patient =
            serde_json::from_str(r#"{"name": "A", "dueDate": "soon", "lastRolloverDate": "??"}"#)
                .unwrap();
        assert_eq!(patient.due_date, None);
        assert_eq!(patient.last_rollover_date, None);
    }

    #[test]
    fn test_round_trip_uses_camel_case() {
        let patient = Patient::new("A".into(), Some(day(2025, 6, 15)), day(2025, 5, 1)).unwrap();
        let json = serde_json::to_string(&patient).unwrap();
        assert!(json.contains("\"dueDate\":\"2025-06-15\""));
        assert!(json.contains("\"lastRolloverDate\":\"2025-05-01\""));

        let back: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patient);
    }

    #[test]
    fn test_repair_task_ids() {
        let mut patient = Patient::new("A".into(), Some(day(2025, 6, 15)), day(2025, 5, 1)).unwrap();
        let mut first = TodayTask::new("x");
        first.id = TaskId::from("dup");
        let mut second = TomorrowTask::new("y");
        second.id = TaskId::from("dup");
        patient.today_tasks.push(first);
        patient.tomorrow_tasks.push(second);

        assert_eq!(patient.repair_task_ids(), 1);
        assert_ne!(patient.today_tasks[0].id, patient.tomorrow_tasks[0].id);
        assert_eq!(patient.today_tasks[0].id, TaskId::from("dup"));
    }
}
