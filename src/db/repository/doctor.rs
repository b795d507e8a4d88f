use rusqlite::{params, Connection};

use super::Repository;
use crate::db::DatabaseError;
use crate::models::{Doctor, NewDoctor};

pub struct DoctorRepository<'a> {
    conn: &'a Connection,
}

impl<'a> DoctorRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// (identity, name) pairs ordered by identity, for selection lists.
    pub fn name_index(&self) -> Result<Vec<(i64, String)>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT doctor_id, name FROM doctors ORDER BY doctor_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }
}

impl Repository<Doctor, NewDoctor> for DoctorRepository<'_> {
    fn insert(&self, new: &NewDoctor) -> Result<i64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO doctors (name, specialization, contact) VALUES (?1, ?2, ?3)",
                params![new.name, new.specialization, new.contact],
            )
            .map_err(DatabaseError::from_write)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> Result<Vec<Doctor>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT doctor_id, name, specialization, contact
             FROM doctors
             ORDER BY doctor_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Doctor {
                id: row.get(0)?,
                name: row.get(1)?,
                specialization: row.get(2)?,
                contact: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }

    fn delete(&self, id: i64) -> Result<usize, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM doctors WHERE doctor_id = ?1", params![id])
            .map_err(DatabaseError::from_write)?;
        Ok(removed)
    }

    fn count(&self) -> Result<i64, DatabaseError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
        Ok(count)
    }
}
