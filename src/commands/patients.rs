//! Patients tab: add, view and delete patients.
//!
//! Adds and deletes refresh the patient selection list used by the
//! appointments tab.

use rusqlite::Connection;

use crate::commands::{report, settle, Outcome};
use crate::db::{DatabaseError, PatientRepository, Repository};
use crate::desk_state::DeskState;
use crate::error::DeskError;
use crate::forms::PatientForm;
use crate::models::Patient;
use crate::selection::EntityKind;

/// Validates and stores a new patient, then returns the refreshed list.
pub fn add_patient(form: &PatientForm, state: &mut DeskState) -> Result<Outcome<Patient>, String> {
    tracing::debug!("add_patient called");
    let id = store_patient(form, state).map_err(|e| report("adding patient", e))?;
    tracing::info!(patient_id = id, "Patient added");
    Ok(settle(state, EntityKind::Patient, "Patient added!", all_patients))
}

fn store_patient(form: &PatientForm, state: &DeskState) -> Result<i64, DeskError> {
    let new = form.validate()?;
    Ok(PatientRepository::new(state.conn()).insert(&new)?)
}

/// Lists all patients by identity.
pub fn list_patients(state: &DeskState) -> Result<Outcome<Patient>, String> {
    all_patients(state.conn())
        .map(Outcome::listed)
        .map_err(|e| report("loading patients", e.into()))
}

/// Deletes the selected patient. An id with no stored row changes nothing.
pub fn delete_patient(id: Option<i64>, state: &mut DeskState) -> Result<Outcome<Patient>, String> {
    let Some(id) = id else {
        return Err(report(
            "deleting patient",
            DeskError::validation("Select a patient to delete"),
        ));
    };

    let removed = PatientRepository::new(state.conn())
        .delete(id)
        .map_err(|e| report("deleting patient", e.into()))?;
    let message = if removed == 0 {
        tracing::debug!(patient_id = id, "Delete matched no patient");
        format!("No patient with id {id}; nothing deleted")
    } else {
        tracing::info!(patient_id = id, "Patient deleted");
        "Patient deleted!".to_string()
    };
    Ok(settle(state, EntityKind::Patient, message, all_patients))
}

fn all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    PatientRepository::new(conn).list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RegistryState;

    fn form(name: &str, age: &str) -> PatientForm {
        PatientForm {
            name: name.into(),
            age: age.into(),
            gender: "F".into(),
            contact: "555-1".into(),
        }
    }

    #[test]
    fn add_returns_refreshed_table_and_registry() {
        let mut state = DeskState::in_memory().unwrap();
        let outcome = add_patient(&form("Alice", "30"), &mut state).unwrap();

        assert_eq!(outcome.message.as_deref(), Some("Patient added!"));
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].name, "Alice");
        assert_eq!(
            state.registry().state(EntityKind::Patient),
            RegistryState::Populated
        );
    }

    #[test]
    fn invalid_form_reports_message_and_stores_nothing() {
        let mut state = DeskState::in_memory().unwrap();

        let err = add_patient(&form("", "30"), &mut state).unwrap_err();
        assert_eq!(err, "Name and Age are required");

        let err = add_patient(&form("Alice", "old"), &mut state).unwrap_err();
        assert!(err.contains("Age must be a number"), "{err}");

        assert!(list_patients(&state).unwrap().rows.is_empty());
    }

    #[test]
    fn delete_without_selection_is_rejected() {
        let mut state = DeskState::in_memory().unwrap();
        let err = delete_patient(None, &mut state).unwrap_err();
        assert_eq!(err, "Select a patient to delete");
    }

    #[test]
    fn delete_unknown_id_succeeds_without_change() {
        let mut state = DeskState::in_memory().unwrap();
        add_patient(&form("Alice", "30"), &mut state).unwrap();

        let outcome = delete_patient(Some(99), &mut state).unwrap();
        assert_eq!(outcome.rows.len(), 1);
    }

    #[test]
    fn delete_last_patient_empties_registry() {
        let mut state = DeskState::in_memory().unwrap();
        let added = add_patient(&form("Alice", "30"), &mut state).unwrap();

        let outcome = delete_patient(Some(added.rows[0].id), &mut state).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Patient deleted!"));
        assert!(outcome.rows.is_empty());
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);
    }

    // A name stored as a blob cannot be read back as text, so every read of
    // the patients table fails while inserts and deletes still work.
    fn plant_unreadable_patient(state: &DeskState) {
        state
            .conn()
            .execute(
                "INSERT INTO patients (name, age) VALUES (X'426F62', 41)",
                [],
            )
            .unwrap();
    }

    fn stored_patients(state: &DeskState) -> i64 {
        PatientRepository::new(state.conn()).count().unwrap()
    }

    #[test]
    fn add_is_reported_once_stored_even_if_reload_fails() {
        let mut state = DeskState::in_memory().unwrap();
        plant_unreadable_patient(&state);

        let outcome = add_patient(&form("Alice", "30"), &mut state).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Patient added!"));
        assert_eq!(outcome.warnings.len(), 2, "{:?}", outcome.warnings);
        assert!(outcome.warnings[0].starts_with("Could not reload the patient list"));
        assert!(outcome.rows.is_empty());

        assert_eq!(stored_patients(&state), 2);
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);
    }

    #[test]
    fn delete_is_reported_once_stored_even_if_reload_fails() {
        let mut state = DeskState::in_memory().unwrap();
        let added = add_patient(&form("Alice", "30"), &mut state).unwrap();
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Populated);
        plant_unreadable_patient(&state);

        let outcome = delete_patient(Some(added.rows[0].id), &mut state).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Patient deleted!"));
        assert!(!outcome.warnings.is_empty());

        assert_eq!(stored_patients(&state), 1);
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);
    }
}
