//! Property tests for the daily schedule rollover and board ordering.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use ward_rounds_core::models::{FutureTask, Patient, TodayTask, TomorrowTask};
use ward_rounds_core::{rollover, rollover_all, sort_patients, SortMode};

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

prop_compose! {
    fn arb_today_task()(
        text in "[a-z]{1,8}",
        completed in any::<bool>(),
    ) -> TodayTask {
        let mut task = TodayTask::new(text);
        task.completed = completed;
        task
    }
}

prop_compose! {
    // Offsets are relative to the rollover day; `None` is undated.
    fn arb_future_task()(
        text in "[a-z]{1,8}",
        offset in proptest::option::of(-4i64..=6),
    ) -> FutureTask {
        let date = offset.map(|o| base_day() + Duration::days(o));
        FutureTask::new(text, date, None)
    }
}

prop_compose! {
    fn arb_patient()(
        name in "[a-z]{1,10}",
        due_offset in proptest::option::of(-300i64..=300),
        today_tasks in proptest::collection::vec(arb_today_task(), 0..5),
        tomorrow in proptest::collection::vec("[a-z]{1,8}", 0..5),
        future_tasks in proptest::collection::vec(arb_future_task(), 0..8),
        today_bp in "[0-9]{2,3}/[0-9]{2,3}",
        room in proptest::option::of("[0-9]{3}"),
        physician in proptest::option::of("[a-z]{1,6}"),
    ) -> Patient {
        let yesterday = base_day() - Duration::days(1);
        let mut patient = Patient::new(name, Some(base_day() + Duration::days(200)), yesterday).unwrap();
        patient.due_date = due_offset.map(|o| base_day() + Duration::days(o));
        patient.today_tasks = today_tasks;
        patient.tomorrow_tasks = tomorrow.into_iter().map(TomorrowTask::new).collect();
        patient.future_tasks = future_tasks;
        patient.today_bp = today_bp;
        patient.room = room;
        patient.physician = physician;
        patient
    }
}

proptest! {
    #[test]
    fn test_rollover_is_idempotent_within_a_day(patient in arb_patient()) {
        let once = rollover(&patient, base_day());
        let twice = rollover(&once, base_day());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_rollover_conserves_live_tasks(patient in arb_patient()) {
        let today = base_day();
        let next = rollover(&patient, today);

        let unfinished = patient.today_tasks.iter().filter(|t| !t.completed).count();
        let live_future = patient
            .future_tasks
            .iter()
            .filter(|t| t.date.map_or(true, |d| d >= today))
            .count();
        let expected = unfinished + patient.tomorrow_tasks.len() + live_future;

        let actual = next.today_tasks.len() + next.tomorrow_tasks.len() + next.future_tasks.len();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_rollover_places_tasks_in_the_right_tier(patient in arb_patient()) {
        let today = base_day();
        let tomorrow = today + Duration::days(1);
        let next = rollover(&patient, today);

        prop_assert!(next.today_tasks.iter().all(|t| !t.completed));
        prop_assert!(next
            .future_tasks
            .iter()
            .all(|t| t.date.map_or(true, |d| d > tomorrow)));

        let due_tomorrow = patient
            .future_tasks
            .iter()
            .filter(|t| t.date == Some(tomorrow))
            .count();
        prop_assert_eq!(next.tomorrow_tasks.len(), due_tomorrow);

        prop_assert_eq!(next.last_rollover_date, Some(today));
        prop_assert_eq!(&next.yesterday_bp, &patient.today_bp);
        prop_assert!(next.today_bp.is_empty());
    }

    #[test]
    fn test_rollover_keeps_identity_fields(patient in arb_patient()) {
        let next = rollover(&patient, base_day());
        prop_assert_eq!(&next.id, &patient.id);
        prop_assert_eq!(&next.name, &patient.name);
        prop_assert_eq!(next.due_date, patient.due_date);
        prop_assert_eq!(&next.subjective, &patient.subjective);
        prop_assert_eq!(&next.selected_problems, &patient.selected_problems);
    }

    #[test]
    fn test_rollover_all_keeps_registration_order(
        patients in proptest::collection::vec(arb_patient(), 0..6),
    ) {
        let rolled = rollover_all(&patients, base_day());
        let before: Vec<&str> = patients.iter().map(|p| p.id.as_str()).collect();
        let after: Vec<&str> = rolled.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn test_every_sort_is_a_permutation(
        patients in proptest::collection::vec(arb_patient(), 0..8),
    ) {
        let mut expected: Vec<&str> = patients.iter().map(|p| p.id.as_str()).collect();
        expected.sort();

        for mode in [
            SortMode::Registration,
            SortMode::ByPhysician,
            SortMode::ByRoom,
            SortMode::ByGestationalWeeks,
        ] {
            let mut ids: Vec<&str> = sort_patients(&patients, mode)
                .into_iter()
                .map(|p| p.id.as_str())
                .collect();
            ids.sort();
            prop_assert_eq!(&ids, &expected);
        }
    }

    #[test]
    fn test_gestational_sort_puts_earliest_due_first(
        patients in proptest::collection::vec(arb_patient(), 0..8),
    ) {
        let dated: Vec<NaiveDate> = sort_patients(&patients, SortMode::ByGestationalWeeks)
            .into_iter()
            .filter_map(|p| p.due_date)
            .collect();
        prop_assert!(dated.windows(2).all(|w| w[0] <= w[1]));
    }
}
