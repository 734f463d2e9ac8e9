//! Patient list ordering for the ward board.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// Board ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Order of registration (input order)
    #[default]
    Registration,
    /// Attending physician, kana-insensitive
    ByPhysician,
    /// Room number, numerically
    ByRoom,
    /// Furthest-along pregnancy first
    ByGestationalWeeks,
}

/// Return the patients in board order. The input is never reordered.
///
/// All sorts are stable. For [`SortMode::ByGestationalWeeks`], patients with
/// no due date stay in the slots they occupy and only dated patients are
/// ordered among the remaining slots.
pub fn sort_patients(patients: &[Patient], mode: SortMode) -> Vec<&Patient> {
    let mut view: Vec<&Patient> = patients.iter().collect();

    match mode {
        SortMode::Registration => {}
        SortMode::ByPhysician => {
            view.sort_by_cached_key(|p| collation_key(p.physician.as_deref().unwrap_or("")));
        }
        SortMode::ByRoom => {
            view.sort_by_key(|p| room_number(p.room.as_deref()));
        }
        SortMode::ByGestationalWeeks => {
            let slots: Vec<usize> = patients
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due_date.is_some())
                .map(|(i, _)| i)
                .collect();

            // Elapsed days since conception differ between two patients by
            // exactly the difference of their due dates, so the earliest due
            // date is the furthest along on any reference day.
            let mut dated: Vec<&Patient> = slots.iter().map(|&i| &patients[i]).collect();
            dated.sort_by_key(|p| p.due_date);

            for (slot, patient) in slots.into_iter().zip(dated) {
                view[slot] = patient;
            }
        }
    }

    view
}

/// Leading integer of a room label, `0` when there is none.
///
/// Mirrors how the board has always read room labels: leading whitespace
/// and a sign are accepted, parsing stops at the first non-digit.
pub fn room_number(label: Option<&str>) -> i64 {
    let Some(label) = label else {
        return 0;
    };
    let trimmed = label.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(if digits.is_empty() { 0 } else { sign * i64::MAX })
}

/// Comparison key for Japanese names: case folded, katakana folded to hiragana.
pub fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient(name: &str) -> Patient {
        Patient::new(name.into(), Some(day(2025, 6, 15)), day(2025, 5, 1)).unwrap()
    }

    fn names<'a>(view: &[&'a Patient]) -> Vec<&'a str> {
        view.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_registration_is_identity() {
        let patients = vec![patient("c"), patient("a"), patient("b")];
        let view = sort_patients(&patients, SortMode::Registration);
        assert_eq!(names(&view), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_by_physician_folds_kana() {
        let mut a = patient("a");
        a.physician = Some("タナカ".into());
        let mut b = patient("b");
        b.physician = Some("さとう".into());
        let c = patient("c");
        let patients = vec![a, b, c];

        let view = sort_patients(&patients, SortMode::ByPhysician);
        // absent physician sorts as empty string
        assert_eq!(names(&view), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_by_room_numeric() {
        let mut a = patient("a");
        a.room = Some("1201".into());
        let mut b = patient("b");
        b.room = Some("302号室".into());
        let mut c = patient("c");
        c.room = Some("個室".into());
        let d = patient("d");
        let patients = vec![a, b, c, d];

        let view = sort_patients(&patients, SortMode::ByRoom);
        assert_eq!(names(&view), vec!["c", "d", "b", "a"]);
    }

    #[test]
    fn test_by_weeks_descending() {
        let mut a = patient("a");
        a.due_date = Some(day(2025, 8, 1));
        let mut b = patient("b");
        b.due_date = Some(day(2025, 6, 1));
        let mut c = patient("c");
        c.due_date = Some(day(2025, 7, 1));
        let patients = vec![a, b, c];

        let view = sort_patients(&patients, SortMode::ByGestationalWeeks);
        assert_eq!(names(&view), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_by_weeks_keeps_undated_in_place() {
        let mut a = patient("a");
        a.due_date = Some(day(2025, 8, 1));
        let mut x = patient("x");
        x.due_date = None;
        let mut b = patient("b");
        b.due_date = Some(day(2025, 6, 1));
        let mut y = patient("y");
        y.due_date = None;
        let patients = vec![a, x, b, y];

        let view = sort_patients(&patients, SortMode::ByGestationalWeeks);
        assert_eq!(names(&view), vec!["b", "x", "a", "y"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let mut a = patient("a");
        a.room = Some("9".into());
        let mut b = patient("b");
        b.room = Some("1".into());
        let patients = vec![a, b];

        let _ = sort_patients(&patients, SortMode::ByRoom);
        assert_eq!(patients[0].name, "a");
    }

    #[test]
    fn test_room_number_parsing() {
        assert_eq!(room_number(Some("301")), 301);
        assert_eq!(room_number(Some("  12B")), 12);
        assert_eq!(room_number(Some("-3")), -3);
        assert_eq!(room_number(Some("A12")), 0);
        assert_eq!(room_number(None), 0);
    }
}
