//! Task completion toggling.

use serde::{Deserialize, Serialize};

use crate::models::{Patient, TaskId};

/// Result of a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOutcome {
    /// The task was found; `completed` is its new state
    Toggled { completed: bool },
    PatientNotFound,
    /// The patient exists but has no today task with that id
    TaskNotFound,
}

impl Patient {
    /// Flip completion of a today task. Returns the new state, `None` if no
    /// today task has this id.
    pub fn toggle_today_task(&mut self, task_id: &TaskId) -> Option<bool> {
        let task = self.today_tasks.iter_mut().find(|t| &t.id == task_id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }
}

/// Toggle a today task in place.
pub fn toggle_in_place(patients: &mut [Patient], patient_id: &str, task_id: &TaskId) -> ToggleOutcome {
    let Some(patient) = patients.iter_mut().find(|p| p.id == patient_id) else {
        return ToggleOutcome::PatientNotFound;
    };
    match patient.toggle_today_task(task_id) {
        Some(completed) => ToggleOutcome::Toggled { completed },
        None => ToggleOutcome::TaskNotFound,
    }
}

/// Return a copy of the ward with one today task toggled. Unknown ids leave
/// the copy identical to the input.
pub fn toggle_task_completion(patients: &[Patient], patient_id: &str, task_id: &TaskId) -> Vec<Patient> {
    let mut next = patients.to_vec();
    toggle_in_place(&mut next, patient_id, task_id);
    next
}
