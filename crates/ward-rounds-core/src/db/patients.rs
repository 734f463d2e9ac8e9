//! Patient database operations.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use super::{Database, DbError, DbResult};
use crate::models::{format_day, parse_day, Patient};
use crate::schedule::{rollover, rollover_all_with_report, RolloverReport};

struct PatientRow {
    id: String,
    record: String,
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let mut patient: Patient = serde_json::from_str(&row.record)?;
        // The column is authoritative for identity.
        patient.id = row.id;
        patient.repair_task_ids();
        Ok(patient)
    }
}

/// Insert at the end of the registration order.
fn insert_record(conn: &Connection, patient: &Patient) -> DbResult<()> {
    let mut patient = patient.clone();
    patient.repair_task_ids();

    conn.execute(
        r#"
        INSERT INTO patients (id, position, name, last_rollover_date, record)
        VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM patients), ?2, ?3, ?4)
        "#,
        params![
            patient.id,
            patient.name,
            patient.last_rollover_date.map(format_day),
            serde_json::to_string(&patient)?,
        ],
    )?;
    Ok(())
}

/// Overwrite a stored record. Returns `false` if the id is not stored.
///
/// The stored rollover day never moves backward: a record edited from a
/// snapshot taken before the last rollover is rolled forward to the stored
/// day before it is written.
fn update_record(conn: &Connection, patient: &Patient) -> DbResult<bool> {
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT last_rollover_date FROM patients WHERE id = ?",
            [patient.id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    let Some(stored) = stored else {
        return Ok(false);
    };
    let stored = stored.as_deref().and_then(|day| parse_day(day).ok());

    let mut patient = match stored {
        Some(stored) if patient.last_rollover_date.map_or(true, |day| day < stored) => {
            warn!(
                patient = %patient.id,
                snapshot = ?patient.last_rollover_date,
                stored = %stored,
                "rolling stale patient snapshot forward"
            );
            rollover(patient, stored)
        }
        _ => patient.clone(),
    };
    patient.repair_task_ids();

    conn.execute(
        r#"
        UPDATE patients SET
            name = ?2,
            last_rollover_date = ?3,
            record = ?4,
            updated_at = datetime('now')
        WHERE id = ?1
        "#,
        params![
            patient.id,
            patient.name,
            patient.last_rollover_date.map(format_day),
            serde_json::to_string(&patient)?,
        ],
    )?;
    Ok(true)
}

impl Database {
    /// Insert a new patient at the end of the registration order.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        insert_record(&self.conn, patient)
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        update_record(&self.conn, patient)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                "SELECT id, record FROM patients WHERE id = ?",
                [id],
                |row| {
                    Ok(PatientRow {
                        id: row.get(0)?,
                        record: row.get(1)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all patients in registration order.
    ///
    /// A record that cannot be decoded at all is skipped and logged so that
    /// the rest of the ward still loads.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, record FROM patients ORDER BY position, rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok(PatientRow {
                id: row.get(0)?,
                record: row.get(1)?,
            })
        })?;

        let mut patients = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match Patient::try_from(row) {
                Ok(patient) => patients.push(patient),
                Err(e) => warn!(patient = %id, error = %e, "skipping unreadable patient record"),
            }
        }
        Ok(patients)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Replace the whole collection in one transaction, keeping the given
    /// order as the registration order.
    pub fn replace_patients(&mut self, patients: &[Patient]) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM patients", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO patients (id, position, name, last_rollover_date, record)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for (position, patient) in patients.iter().enumerate() {
                let mut patient = patient.clone();
                patient.repair_task_ids();
                stmt.execute(params![
                    patient.id,
                    position as i64 + 1,
                    patient.name,
                    patient.last_rollover_date.map(format_day),
                    serde_json::to_string(&patient)?,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = patients.len(), "replaced patient collection");
        Ok(())
    }

    /// Import a JSON array of patient records (e.g. an export of the
    /// browser board). Existing ids are updated in place, new ones appended.
    /// Returns the number of records imported.
    pub fn import_patients_json(&mut self, json: &str) -> DbResult<usize> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(items) = value else {
            return Err(DbError::Constraint(
                "expected a JSON array of patient records".into(),
            ));
        };

        let mut patients = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Patient>(item) {
                Ok(patient) => patients.push(patient),
                Err(e) => warn!(index, error = %e, "skipping unreadable imported record"),
            }
        }

        let tx = self.transaction()?;
        for patient in &patients {
            if !update_record(&tx, patient)? {
                insert_record(&tx, patient)?;
            }
        }
        tx.commit()?;

        Ok(patients.len())
    }

    /// Export the collection as a pretty-printed JSON array.
    pub fn export_patients_json(&self) -> DbResult<String> {
        let patients = self.list_patients()?;
        Ok(serde_json::to_string_pretty(&patients)?)
    }

    /// Roll the stored ward over to `today` and write back the records that
    /// changed. Safe to call on every tick.
    pub fn rollover_stored_patients(&mut self, today: NaiveDate) -> DbResult<RolloverReport> {
        let patients = self.list_patients()?;
        let (rolled, report) = rollover_all_with_report(&patients, today);

        let tx = self.transaction()?;
        for (before, after) in patients.iter().zip(&rolled) {
            if before == after {
                continue;
            }
            tx.execute(
                r#"
                UPDATE patients SET last_rollover_date = ?2, record = ?3,
                    updated_at = datetime('now')
                WHERE id = ?1
                "#,
                params![
                    after.id,
                    after.last_rollover_date.map(format_day),
                    serde_json::to_string(after)?,
                ],
            )?;
        }
        tx.commit()?;

        Ok(report)
    }

    /// Fetch a patient or fail with [`DbError::NotFound`].
    pub fn require_patient(&self, id: &str) -> DbResult<Patient> {
        self.get_patient(id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", id)))
    }
}
