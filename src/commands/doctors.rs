//! Doctors tab: add, view and delete doctors.

use rusqlite::Connection;

use crate::commands::{report, settle, Outcome};
use crate::db::{DatabaseError, DoctorRepository, Repository};
use crate::desk_state::DeskState;
use crate::error::DeskError;
use crate::forms::DoctorForm;
use crate::models::Doctor;
use crate::selection::EntityKind;

pub fn add_doctor(form: &DoctorForm, state: &mut DeskState) -> Result<Outcome<Doctor>, String> {
    tracing::debug!("add_doctor called");
    let new = form.validate().map_err(|e| report("adding doctor", e))?;
    let id = DoctorRepository::new(state.conn())
        .insert(&new)
        .map_err(|e| report("adding doctor", e.into()))?;
    tracing::info!(doctor_id = id, "Doctor added");
    Ok(settle(state, EntityKind::Doctor, "Doctor added!", all_doctors))
}

pub fn list_doctors(state: &DeskState) -> Result<Outcome<Doctor>, String> {
    all_doctors(state.conn())
        .map(Outcome::listed)
        .map_err(|e| report("loading doctors", e.into()))
}

/// Appointments of the doctor go with it (cascade).
pub fn delete_doctor(id: Option<i64>, state: &mut DeskState) -> Result<Outcome<Doctor>, String> {
    let Some(id) = id else {
        return Err(report(
            "deleting doctor",
            DeskError::validation("Select a doctor to delete"),
        ));
    };

    let removed = DoctorRepository::new(state.conn())
        .delete(id)
        .map_err(|e| report("deleting doctor", e.into()))?;
    let message = if removed == 0 {
        tracing::debug!(doctor_id = id, "Delete matched no doctor");
        format!("No doctor with id {id}; nothing deleted")
    } else {
        tracing::info!(doctor_id = id, "Doctor deleted");
        "Doctor deleted!".to_string()
    };
    Ok(settle(state, EntityKind::Doctor, message, all_doctors))
}

fn all_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    DoctorRepository::new(conn).list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RegistryState;

    fn smith() -> DoctorForm {
        DoctorForm {
            name: "Dr. Smith".into(),
            specialization: "Cardiology".into(),
            contact: "555-2".into(),
        }
    }

    #[test]
    fn add_then_list() {
        let mut state = DeskState::in_memory().unwrap();
        add_doctor(&smith(), &mut state).unwrap();

        let listed = list_doctors(&state).unwrap();
        assert_eq!(listed.message, None);
        assert_eq!(listed.rows.len(), 1);
        assert_eq!(listed.rows[0].specialization, "Cardiology");
        assert_eq!(state.registry().state(EntityKind::Doctor), RegistryState::Populated);
    }

    #[test]
    fn name_is_required() {
        let mut state = DeskState::in_memory().unwrap();
        let err = add_doctor(&DoctorForm::default(), &mut state).unwrap_err();
        assert_eq!(err, "Name is required");
    }

    #[test]
    fn delete_refreshes_registry() {
        let mut state = DeskState::in_memory().unwrap();
        add_doctor(&smith(), &mut state).unwrap();
        let jones = add_doctor(
            &DoctorForm {
                name: "Dr. Jones".into(),
                ..Default::default()
            },
            &mut state,
        )
        .unwrap();

        delete_doctor(Some(jones.rows[1].id), &mut state).unwrap();
        let names: Vec<&str> = state
            .registry()
            .options(EntityKind::Doctor)
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dr. Smith"]);
    }

    #[test]
    fn failed_refresh_keeps_the_add_and_blocks_booking() {
        let mut state = DeskState::in_memory().unwrap();
        state
            .conn()
            .execute("INSERT INTO doctors (name) VALUES (X'4472204E6F')", [])
            .unwrap();

        let outcome = add_doctor(&smith(), &mut state).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Doctor added!"));
        assert!(outcome.warnings[0].starts_with("Could not reload the doctor list"));
        assert_eq!(DoctorRepository::new(state.conn()).count().unwrap(), 2);
        assert_eq!(state.registry().state(EntityKind::Doctor), RegistryState::Empty);
    }

    #[test]
    fn delete_without_selection_is_rejected() {
        let mut state = DeskState::in_memory().unwrap();
        assert_eq!(
            delete_doctor(None, &mut state).unwrap_err(),
            "Select a doctor to delete"
        );
    }
}
