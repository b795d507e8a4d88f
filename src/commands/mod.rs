//! Presentation controllers. Each user action is a named [`DeskCommand`]
//! run against the shared [`DeskState`]; failures come back as a single
//! user-facing message.

pub mod appointments;
pub mod doctors;
pub mod patients;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::desk_state::DeskState;
use crate::error::DeskError;
use crate::forms::{AppointmentForm, DoctorForm, PatientForm};
use crate::selection::EntityKind;
use crate::table::{TableRow, TableView};

/// Result of a successful action: an optional confirmation plus the
/// refreshed rows of the affected tab. Warnings describe follow-up reads
/// that failed after the action itself was stored.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub message: Option<String>,
    pub warnings: Vec<String>,
    pub rows: Vec<T>,
}

impl<T> Outcome<T> {
    pub fn listed(rows: Vec<T>) -> Self {
        Self {
            message: None,
            warnings: Vec::new(),
            rows,
        }
    }

    pub fn with_message(message: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            message: Some(message.into()),
            warnings: Vec::new(),
            rows,
        }
    }

    fn reload(&mut self, conn: &Connection, rows: fn(&Connection) -> Result<Vec<T>, DatabaseError>) {
        match rows(conn) {
            Ok(rows) => self.rows = rows,
            Err(e) => self.warn("Could not reload the table", e),
        }
    }

    fn warn(&mut self, what: &str, error: DatabaseError) {
        tracing::warn!(error = %error, "{what}");
        self.warnings.push(format!("{what}: {error}"));
    }
}

impl<T: TableRow> Outcome<T> {
    pub fn into_response(self) -> DeskResponse {
        DeskResponse {
            message: self.message,
            warnings: self.warnings,
            table: TableView::from_rows(&self.rows),
        }
    }
}

/// Outcome rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeskResponse {
    pub message: Option<String>,
    pub warnings: Vec<String>,
    pub table: TableView,
}

/// Every action the three tabs offer.
#[derive(Debug, Clone)]
pub enum DeskCommand {
    AddPatient(PatientForm),
    ListPatients,
    DeletePatient(Option<i64>),
    AddDoctor(DoctorForm),
    ListDoctors,
    DeleteDoctor(Option<i64>),
    AddAppointment(AppointmentForm),
    ListAppointments,
    DeleteAppointment(Option<i64>),
    /// Current choices offered by the appointment form.
    ListOptions(EntityKind),
}

impl DeskCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPatient(_) => "add_patient",
            Self::ListPatients => "list_patients",
            Self::DeletePatient(_) => "delete_patient",
            Self::AddDoctor(_) => "add_doctor",
            Self::ListDoctors => "list_doctors",
            Self::DeleteDoctor(_) => "delete_doctor",
            Self::AddAppointment(_) => "add_appointment",
            Self::ListAppointments => "list_appointments",
            Self::DeleteAppointment(_) => "delete_appointment",
            Self::ListOptions(_) => "list_options",
        }
    }
}

/// Run one command against the state.
pub fn dispatch(state: &mut DeskState, command: DeskCommand) -> Result<DeskResponse, String> {
    tracing::debug!(command = command.name(), "Dispatching");
    match command {
        DeskCommand::AddPatient(form) => {
            patients::add_patient(&form, state).map(Outcome::into_response)
        }
        DeskCommand::ListPatients => patients::list_patients(state).map(Outcome::into_response),
        DeskCommand::DeletePatient(id) => {
            patients::delete_patient(id, state).map(Outcome::into_response)
        }
        DeskCommand::AddDoctor(form) => {
            doctors::add_doctor(&form, state).map(Outcome::into_response)
        }
        DeskCommand::ListDoctors => doctors::list_doctors(state).map(Outcome::into_response),
        DeskCommand::DeleteDoctor(id) => {
            doctors::delete_doctor(id, state).map(Outcome::into_response)
        }
        DeskCommand::AddAppointment(form) => {
            appointments::add_appointment(&form, state).map(Outcome::into_response)
        }
        DeskCommand::ListAppointments => {
            appointments::list_appointments(state).map(Outcome::into_response)
        }
        DeskCommand::DeleteAppointment(id) => {
            appointments::delete_appointment(id, state).map(Outcome::into_response)
        }
        DeskCommand::ListOptions(kind) => Ok(DeskResponse {
            message: None,
            warnings: Vec::new(),
            table: TableView::from_rows(state.registry().options(kind)),
        }),
    }
}

/// Convert a failure into the message shown to the user. Storage failures
/// carry the action that failed; input problems are shown as-is.
pub(crate) fn report(action: &str, error: DeskError) -> String {
    tracing::warn!(action, error = %error, "Action failed");
    if error.is_storage() {
        format!("Error {action}: {error}")
    } else {
        error.to_string()
    }
}

/// Reload the selection list and rows after a committed patient or doctor
/// change. The change is already stored, so read failures here become
/// warnings on a successful outcome.
pub(crate) fn settle<T>(
    state: &mut DeskState,
    kind: EntityKind,
    message: impl Into<String>,
    rows: fn(&Connection) -> Result<Vec<T>, DatabaseError>,
) -> Outcome<T> {
    let mut outcome = Outcome::with_message(message, Vec::new());
    if let Err(e) = state.refresh_selection(kind) {
        outcome.warn(
            &format!(
                "Could not reload the {} list; booking is blocked until it reloads",
                kind.as_str()
            ),
            e,
        );
    }
    outcome.reload(state.conn(), rows);
    outcome
}

/// Rebuild the tab's rows after a committed change.
pub(crate) fn reloaded<T>(
    conn: &Connection,
    message: impl Into<String>,
    rows: fn(&Connection) -> Result<Vec<T>, DatabaseError>,
) -> Outcome<T> {
    let mut outcome = Outcome::with_message(message, Vec::new());
    outcome.reload(conn, rows);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RegistryState;

    fn cell(response: &DeskResponse, row: usize, column: &str) -> String {
        let index = response
            .table
            .columns
            .iter()
            .position(|c| *c == column)
            .unwrap();
        response.table.rows[row][index].clone()
    }

    #[test]
    fn end_to_end_booking_flow() {
        let mut state = DeskState::in_memory().unwrap();

        let patients = dispatch(
            &mut state,
            DeskCommand::AddPatient(PatientForm {
                name: "Alice".into(),
                age: "30".into(),
                gender: "F".into(),
                contact: "555-1".into(),
            }),
        )
        .unwrap();
        assert_eq!(patients.table.rows, vec![vec!["1", "Alice", "30", "F", "555-1"]]);

        let doctors = dispatch(
            &mut state,
            DeskCommand::AddDoctor(DoctorForm {
                name: "Dr. Smith".into(),
                specialization: "Cardiology".into(),
                contact: "555-2".into(),
            }),
        )
        .unwrap();
        assert_eq!(doctors.table.rows, vec![vec!["1", "Dr. Smith", "Cardiology", "555-2"]]);

        let patient = state.registry().resolve(EntityKind::Patient, "1 - Alice").unwrap();
        let doctor = state.registry().resolve(EntityKind::Doctor, "1 - Dr. Smith").unwrap();
        let appointments = dispatch(
            &mut state,
            DeskCommand::AddAppointment(AppointmentForm {
                patient: Some(patient.clone()),
                doctor: Some(doctor.clone()),
                date_time: "2024-06-01 09:30".into(),
                remarks: "checkup".into(),
            }),
        )
        .unwrap();
        assert_eq!(appointments.table.rows.len(), 1);
        assert_eq!(cell(&appointments, 0, "Patient"), "Alice");
        assert_eq!(cell(&appointments, 0, "Doctor"), "Dr. Smith");
        assert_eq!(cell(&appointments, 0, "Date & Time"), "2024-06-01 09:30");

        dispatch(&mut state, DeskCommand::DeletePatient(Some(1))).unwrap();
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);

        let err = dispatch(
            &mut state,
            DeskCommand::AddAppointment(AppointmentForm {
                patient: Some(patient),
                doctor: Some(doctor),
                date_time: "2024-06-02 09:30".into(),
                remarks: String::new(),
            }),
        )
        .unwrap_err();
        assert_eq!(err, "Please add patients and doctors first.");

        let listed = dispatch(&mut state, DeskCommand::ListAppointments).unwrap();
        assert!(listed.table.is_empty());
    }

    #[test]
    fn list_options_renders_registry() {
        let mut state = DeskState::in_memory().unwrap();
        dispatch(
            &mut state,
            DeskCommand::AddDoctor(DoctorForm {
                name: "Dr. Smith".into(),
                ..Default::default()
            }),
        )
        .unwrap();

        let options = dispatch(&mut state, DeskCommand::ListOptions(EntityKind::Doctor)).unwrap();
        assert_eq!(options.table.rows, vec![vec!["1 - Dr. Smith"]]);
    }

    #[test]
    fn storage_failures_name_the_action() {
        let message = report(
            "adding patient",
            DeskError::Storage(crate::db::DatabaseError::ConstraintViolation("boom".into())),
        );
        assert_eq!(message, "Error adding patient: Constraint violated: boom");
    }

    #[test]
    fn input_failures_are_shown_verbatim() {
        let message = report("adding doctor", DeskError::validation("Name is required"));
        assert_eq!(message, "Name is required");
    }
}
