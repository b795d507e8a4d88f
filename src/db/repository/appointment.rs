use rusqlite::{params, Connection};

use super::Repository;
use crate::db::DatabaseError;
use crate::models::{AppointmentListing, NewAppointment};

pub struct AppointmentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AppointmentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Repository<AppointmentListing, NewAppointment> for AppointmentRepository<'_> {
    /// Referenced patient and doctor must exist; the foreign keys reject
    /// anything else as a constraint violation.
    fn insert(&self, new: &NewAppointment) -> Result<i64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO appointments (patient_id, doctor_id, appointment_date, remarks)
                 VALUES (?1, ?2, ?3, ?4)",
                params![new.patient_id, new.doctor_id, new.scheduled_at, new.remarks],
            )
            .map_err(DatabaseError::from_write)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Appointments joined to patient and doctor names, earliest first.
    fn list(&self) -> Result<Vec<AppointmentListing>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.appointment_id, p.name, d.name, a.appointment_date, a.remarks
             FROM appointments a
             JOIN patients p ON a.patient_id = p.patient_id
             JOIN doctors d ON a.doctor_id = d.doctor_id
             ORDER BY a.appointment_date ASC, a.appointment_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AppointmentListing {
                id: row.get(0)?,
                patient_name: row.get(1)?,
                doctor_name: row.get(2)?,
                scheduled_at: row.get(3)?,
                remarks: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }

    fn delete(&self, id: i64) -> Result<usize, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM appointments WHERE appointment_id = ?1", params![id])
            .map_err(DatabaseError::from_write)?;
        Ok(removed)
    }

    fn count(&self) -> Result<i64, DatabaseError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
        Ok(count)
    }
}
