use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Input and display pattern for appointment times (`yyyy-MM-dd HH:mm`).
pub const APPOINTMENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_at: NaiveDateTime,
    pub remarks: Option<String>,
}

/// Appointment joined with the patient and doctor names, as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentListing {
    pub id: i64,
    pub patient_name: String,
    pub doctor_name: String,
    pub scheduled_at: NaiveDateTime,
    pub remarks: Option<String>,
}

impl AppointmentListing {
    pub fn display_time(&self) -> String {
        self.scheduled_at.format(APPOINTMENT_TIME_FORMAT).to_string()
    }
}
