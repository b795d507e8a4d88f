use rusqlite::{params, Connection, Row};

use super::Repository;
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

pub struct PatientRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PatientRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// (identity, name) pairs ordered by identity, for selection lists.
    pub fn name_index(&self) -> Result<Vec<(i64, String)>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT patient_id, name FROM patients ORDER BY patient_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        contact: row.get(4)?,
    })
}

impl Repository<Patient, NewPatient> for PatientRepository<'_> {
    fn insert(&self, new: &NewPatient) -> Result<i64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO patients (name, age, gender, contact) VALUES (?1, ?2, ?3, ?4)",
                params![new.name, new.age, new.gender, new.contact],
            )
            .map_err(DatabaseError::from_write)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> Result<Vec<Patient>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, name, age, gender, contact
             FROM patients
             ORDER BY patient_id",
        )?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }

    fn delete(&self, id: i64) -> Result<usize, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM patients WHERE patient_id = ?1", params![id])
            .map_err(DatabaseError::from_write)?;
        Ok(removed)
    }

    fn count(&self) -> Result<i64, DatabaseError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn new_patient(name: &str, age: u32) -> NewPatient {
        NewPatient {
            name: name.into(),
            age,
            gender: "F".into(),
            contact: "555-1".into(),
        }
    }

    #[test]
    fn insert_then_list_returns_fields_and_fresh_id() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);

        let id = repo.insert(&new_patient("Alice", 30)).unwrap();
        let patients = repo.list().unwrap();

        assert_eq!(
            patients,
            vec![Patient {
                id,
                name: "Alice".into(),
                age: 30,
                gender: "F".into(),
                contact: "555-1".into(),
            }]
        );
        assert_eq!(id, 1);
    }

    #[test]
    fn list_is_empty_for_new_store() {
        let conn = open_memory_database().unwrap();
        assert!(PatientRepository::new(&conn).list().unwrap().is_empty());
    }

    #[test]
    fn list_orders_by_identity() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        repo.insert(&new_patient("Zoe", 20)).unwrap();
        repo.insert(&new_patient("Adam", 50)).unwrap();
        repo.insert(&new_patient("Mia", 9)).unwrap();

        let ids: Vec<i64> = repo.list().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn delete_removes_only_that_row() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        let keep = repo.insert(&new_patient("Keep", 1)).unwrap();
        let gone = repo.insert(&new_patient("Gone", 2)).unwrap();

        assert_eq!(repo.delete(gone).unwrap(), 1);
        let ids: Vec<i64> = repo.list().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn delete_absent_id_is_noop() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        repo.insert(&new_patient("Alice", 30)).unwrap();

        assert_eq!(repo.delete(99).unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn identities_are_not_reused_after_delete() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        let first = repo.insert(&new_patient("A", 1)).unwrap();
        repo.delete(first).unwrap();
        let second = repo.insert(&new_patient("B", 2)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn blank_name_violates_constraint() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        let err = repo.insert(&new_patient("   ", 3)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn name_index_pairs_id_and_name() {
        let conn = open_memory_database().unwrap();
        let repo = PatientRepository::new(&conn);
        repo.insert(&new_patient("Alice", 30)).unwrap();
        repo.insert(&new_patient("Bob", 41)).unwrap();

        assert_eq!(
            repo.name_index().unwrap(),
            vec![(1, "Alice".to_string()), (2, "Bob".to_string())]
        );
    }
}
