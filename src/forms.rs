//! Raw form input for the three tabs and its validation into insert records.
//!
//! Text fields arrive exactly as typed. Validation order follows the tab:
//! required fields first, then number/date parsing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::models::{NewAppointment, NewDoctor, NewPatient, APPOINTMENT_TIME_FORMAT};
use crate::selection::{EntityKind, SelectionOption, SelectionRegistry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub contact: String,
}

impl PatientForm {
    pub fn validate(&self) -> Result<NewPatient, DeskError> {
        let name = self.name.trim();
        let age = self.age.trim();
        if name.is_empty() || age.is_empty() {
            return Err(DeskError::validation("Name and Age are required"));
        }
        Ok(NewPatient {
            name: name.to_string(),
            age: parse_age(age)?,
            gender: self.gender.trim().to_string(),
            contact: self.contact.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorForm {
    pub name: String,
    pub specialization: String,
    pub contact: String,
}

impl DoctorForm {
    pub fn validate(&self) -> Result<NewDoctor, DeskError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DeskError::validation("Name is required"));
        }
        Ok(NewDoctor {
            name: name.to_string(),
            specialization: self.specialization.trim().to_string(),
            contact: self.contact.trim().to_string(),
        })
    }
}

/// Appointment tab input. Patient and doctor are typed selections taken from
/// the [`SelectionRegistry`], never free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentForm {
    pub patient: Option<SelectionOption>,
    pub doctor: Option<SelectionOption>,
    pub date_time: String,
    pub remarks: String,
}

impl AppointmentForm {
    pub fn validate(&self, registry: &SelectionRegistry) -> Result<NewAppointment, DeskError> {
        registry.ensure_bookable()?;

        let (Some(patient), Some(doctor)) = (&self.patient, &self.doctor) else {
            return Err(DeskError::validation("Please select a patient and doctor."));
        };
        if !registry.offers(EntityKind::Patient, patient.id) {
            return Err(DeskError::validation(format!(
                "Patient '{patient}' is no longer available"
            )));
        }
        if !registry.offers(EntityKind::Doctor, doctor.id) {
            return Err(DeskError::validation(format!(
                "Doctor '{doctor}' is no longer available"
            )));
        }

        let scheduled_at = parse_appointment_time(&self.date_time)?;
        let remarks = self.remarks.trim();

        Ok(NewAppointment {
            patient_id: patient.id,
            doctor_id: doctor.id,
            scheduled_at,
            remarks: (!remarks.is_empty()).then(|| remarks.to_string()),
        })
    }
}

/// Whole, non-negative age in years.
pub fn parse_age(text: &str) -> Result<u32, DeskError> {
    let value: i64 = text.parse().map_err(|_| DeskError::NumericParse {
        field: "Age",
        value: text.to_string(),
    })?;
    if value < 0 {
        return Err(DeskError::validation("Age cannot be negative"));
    }
    u32::try_from(value).map_err(|_| DeskError::validation("Age is out of range"))
}

/// Parse `yyyy-MM-dd HH:mm` exactly: zero padded, 24 hour, nothing around it.
pub fn parse_appointment_time(text: &str) -> Result<NaiveDateTime, DeskError> {
    if !has_time_shape(text) {
        return Err(DeskError::DateParse(text.to_string()));
    }
    NaiveDateTime::parse_from_str(text, APPOINTMENT_TIME_FORMAT)
        .map_err(|_| DeskError::DateParse(text.to_string()))
}

// chrono accepts unpadded fields, so the layout is checked first.
fn has_time_shape(text: &str) -> bool {
    const SHAPE: &[u8] = b"dddd-dd-dd dd:dd";
    let bytes = text.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(&b, &s)| match s {
            b'd' => b.is_ascii_digit(),
            literal => b == literal,
        })
}
