//! Appointments tab: book, view and cancel appointments.
//!
//! Patient and doctor come from the selection registry; booking is refused
//! while either list is empty.

use rusqlite::Connection;

use crate::commands::{reloaded, report, Outcome};
use crate::db::{AppointmentRepository, DatabaseError, Repository};
use crate::desk_state::DeskState;
use crate::error::DeskError;
use crate::forms::AppointmentForm;
use crate::models::AppointmentListing;

/// Books an appointment and returns the refreshed, date-ordered listing.
pub fn add_appointment(
    form: &AppointmentForm,
    state: &DeskState,
) -> Result<Outcome<AppointmentListing>, String> {
    tracing::debug!("add_appointment called");
    let new = form
        .validate(state.registry())
        .map_err(|e| report("adding appointment", e))?;
    let id = AppointmentRepository::new(state.conn())
        .insert(&new)
        .map_err(|e| report("adding appointment", e.into()))?;
    tracing::info!(
        appointment_id = id,
        patient_id = new.patient_id,
        doctor_id = new.doctor_id,
        "Appointment added"
    );
    Ok(reloaded(state.conn(), "Appointment added!", all_appointments))
}

pub fn list_appointments(state: &DeskState) -> Result<Outcome<AppointmentListing>, String> {
    all_appointments(state.conn())
        .map(Outcome::listed)
        .map_err(|e| report("loading appointments", e.into()))
}

pub fn delete_appointment(
    id: Option<i64>,
    state: &DeskState,
) -> Result<Outcome<AppointmentListing>, String> {
    let Some(id) = id else {
        return Err(report(
            "deleting appointment",
            DeskError::validation("Select an appointment to delete"),
        ));
    };

    let removed = AppointmentRepository::new(state.conn())
        .delete(id)
        .map_err(|e| report("deleting appointment", e.into()))?;
    let message = if removed == 0 {
        tracing::debug!(appointment_id = id, "Delete matched no appointment");
        format!("No appointment with id {id}; nothing deleted")
    } else {
        tracing::info!(appointment_id = id, "Appointment deleted");
        "Appointment deleted!".to_string()
    };
    Ok(reloaded(state.conn(), message, all_appointments))
}

fn all_appointments(conn: &Connection) -> Result<Vec<AppointmentListing>, DatabaseError> {
    AppointmentRepository::new(conn).list()
}
