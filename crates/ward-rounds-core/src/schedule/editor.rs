//! Adding and removing schedule entries, and the ward-wide task board.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::{format_time, FutureTask, Patient, TaskId, TodayTask, TomorrowTask};

/// One-tap entries offered next to every tier's input.
pub const QUICK_TASKS: [&str; 6] = [
    "血液検査",
    "術前検査",
    "帝王切開",
    "IC",
    "他科コンサルト",
    "他科受診",
];

/// The only preset that keeps a time when planned into the future tier.
pub const TIMED_QUICK_TASK: &str = "IC";

/// Display text for a new entry, with the time appended as ` (HH:MM)`.
/// Blank text yields `None`.
pub fn task_label(text: &str, time: Option<NaiveTime>) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(match time {
        Some(time) => format!("{} ({})", text, format_time(time)),
        None => text.to_string(),
    })
}

impl Patient {
    /// Add a task for today. Returns the new id, `None` for blank text.
    pub fn add_today_task(&mut self, text: &str, time: Option<NaiveTime>) -> Option<TaskId> {
        let task = TodayTask::new(task_label(text, time)?);
        let id = task.id.clone();
        self.today_tasks.push(task);
        Some(id)
    }

    /// Add a task for tomorrow. Returns the new id, `None` for blank text.
    pub fn add_tomorrow_task(&mut self, text: &str, time: Option<NaiveTime>) -> Option<TaskId> {
        let task = TomorrowTask::new(task_label(text, time)?);
        let id = task.id.clone();
        self.tomorrow_tasks.push(task);
        Some(id)
    }

    /// Add a future task. Without a date the entry is kept indefinitely and
    /// any time is discarded.
    pub fn add_future_task(
        &mut self,
        text: &str,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Option<TaskId> {
        let time = date.and(time);
        let task = FutureTask::new(task_label(text, time)?, date, time);
        let id = task.id.clone();
        self.future_tasks.push(task);
        Some(id)
    }

    /// Plan a quick preset on a given day. Presets in the future tier are
    /// always dated, and only [`TIMED_QUICK_TASK`] keeps its time.
    pub fn add_quick_future_task(
        &mut self,
        preset: &str,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> Option<TaskId> {
        let time = time.filter(|_| preset.trim() == TIMED_QUICK_TASK);
        self.add_future_task(preset, Some(date), time)
    }

    pub fn remove_today_task(&mut self, id: &TaskId) -> bool {
        let before = self.today_tasks.len();
        self.today_tasks.retain(|t| &t.id != id);
        self.today_tasks.len() != before
    }

    pub fn remove_tomorrow_task(&mut self, id: &TaskId) -> bool {
        let before = self.tomorrow_tasks.len();
        self.tomorrow_tasks.retain(|t| &t.id != id);
        self.tomorrow_tasks.len() != before
    }

    pub fn remove_future_task(&mut self, id: &TaskId) -> bool {
        let before = self.future_tasks.len();
        self.future_tasks.retain(|t| &t.id != id);
        self.future_tasks.len() != before
    }
}

/// A today task together with the patient it belongs to.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardEntry<'a> {
    pub patient_id: &'a str,
    pub patient_name: &'a str,
    pub task: &'a TodayTask,
}

/// Every today task on the ward, in registration order.
pub fn today_task_board(patients: &[Patient]) -> Vec<BoardEntry<'_>> {
    patients
        .iter()
        .flat_map(|patient| {
            patient.today_tasks.iter().map(move |task| BoardEntry {
                patient_id: &patient.id,
                patient_name: &patient.name,
                task,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn patient(name: &str) -> Patient {
        Patient::new(name.into(), Some(day(2025, 6, 15)), day(2025, 6, 1)).unwrap()
    }

    #[test]
    fn test_task_label() {
        assert_eq!(task_label(" IC ", Some(time(14, 0))).as_deref(), Some("IC (14:00)"));
        assert_eq!(task_label("採血", None).as_deref(), Some("採血"));
        assert_eq!(task_label("   ", Some(time(9, 0))), None);
    }

    #[test]
    fn test_add_and_remove_today() {
        let mut p = patient("A");
        let id = p.add_today_task(QUICK_TASKS[0], Some(time(9, 30))).unwrap();
        assert_eq!(p.today_tasks[0].text, "血液検査 (09:30)");
        assert!(!p.today_tasks[0].completed);

        assert!(p.remove_today_task(&id));
        assert!(!p.remove_today_task(&id));
        assert!(p.today_tasks.is_empty());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut p = patient("A");
        assert!(p.add_tomorrow_task("", None).is_none());
        assert!(p.tomorrow_tasks.is_empty());
    }

    #[test]
    fn test_undated_future_task_drops_time() {
        let mut p = patient("A");
        p.add_future_task("退院指導", None, Some(time(10, 0))).unwrap();
        let task = &p.future_tasks[0];
        assert!(task.is_undated());
        assert_eq!(task.time, None);
        assert_eq!(task.text, "退院指導");
    }

    #[test]
    fn test_dated_future_task_keeps_time() {
        let mut p = patient("A");
        let id = p
            .add_future_task("帝王切開", Some(day(2025, 6, 10)), Some(time(9, 0)))
            .unwrap();
        let task = &p.future_tasks[0];
        assert_eq!(task.text, "帝王切開 (09:00)");
        assert_eq!(task.time, Some(time(9, 0)));
        assert!(p.remove_future_task(&id));
    }

    #[test]
    fn test_quick_future_task_time_only_for_ic() {
        let mut p = patient("A");
        p.add_quick_future_task(TIMED_QUICK_TASK, day(2025, 6, 10), Some(time(15, 0)))
            .unwrap();
        p.add_quick_future_task("術前検査", day(2025, 6, 11), Some(time(15, 0)))
            .unwrap();

        let ic = &p.future_tasks[0];
        assert_eq!(ic.text, "IC (15:00)");
        assert_eq!(ic.date, Some(day(2025, 6, 10)));
        assert_eq!(ic.time, Some(time(15, 0)));

        let preop = &p.future_tasks[1];
        assert_eq!(preop.text, "術前検査");
        assert_eq!(preop.date, Some(day(2025, 6, 11)));
        assert_eq!(preop.time, None);
    }

    #[test]
    fn test_ids_unique_across_tiers() {
        let mut p = patient("A");
        let a = p.add_today_task("a", None).unwrap();
        let b = p.add_tomorrow_task("b", None).unwrap();
        let c = p.add_future_task("c", None, None).unwrap();
        assert!(a != b && b != c && a != c);
        assert!(p.has_task(&a) && p.has_task(&b) && p.has_task(&c));
    }

    #[test]
    fn test_task_board() {
        let mut a = patient("A");
        a.add_today_task("1", None);
        a.add_today_task("2", None);
        let b = patient("B");
        let mut c = patient("C");
        c.add_today_task("3", None);
        let patients = vec![a, b, c];

        let board = today_task_board(&patients);
        let rows: Vec<(&str, &str)> = board
            .iter()
            .map(|e| (e.patient_name, e.task.text.as_str()))
            .collect();
        assert_eq!(rows, vec![("A", "1"), ("A", "2"), ("C", "3")]);
        assert_eq!(board[2].patient_id, patients[2].id);
    }
}
