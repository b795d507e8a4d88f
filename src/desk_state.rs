//! Application state shared by every controller: the store handle and the
//! selection registry built from it.

use std::path::Path;

use rusqlite::Connection;

use crate::config::ConnectionConfig;
use crate::db::{Database, DatabaseError};
use crate::selection::{EntityKind, SelectionRegistry};

pub struct DeskState {
    db: Database,
    registry: SelectionRegistry,
}

impl DeskState {
    /// Wrap an open store and load the selection lists from it.
    pub fn new(db: Database) -> Result<Self, DatabaseError> {
        let registry = SelectionRegistry::load(db.conn())?;
        Ok(Self { db, registry })
    }

    pub fn open(config: &ConnectionConfig, data_dir: &Path) -> Result<Self, DatabaseError> {
        Self::new(Database::open(config, data_dir)?)
    }

    /// State over an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(Database::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        self.db.conn()
    }

    pub fn registry(&self) -> &SelectionRegistry {
        &self.registry
    }

    /// Reload the selection list for `kind` after its records changed.
    pub fn refresh_selection(&mut self, kind: EntityKind) -> Result<(), DatabaseError> {
        self.registry.refresh(self.db.conn(), kind)
    }

    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RegistryState;

    #[test]
    fn in_memory_state_starts_empty() {
        let state = DeskState::in_memory().unwrap();
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);
        assert_eq!(state.registry().state(EntityKind::Doctor), RegistryState::Empty);
    }

    #[test]
    fn open_loads_existing_records_into_registry() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectionConfig::default();

        let state = DeskState::open(&config, dir.path()).unwrap();
        state
            .conn()
            .execute(
                "INSERT INTO doctors (name, specialization, contact) VALUES ('Dr. Smith', '', '')",
                [],
            )
            .unwrap();
        state.close().unwrap();

        let state = DeskState::open(&config, dir.path()).unwrap();
        assert_eq!(state.registry().options(EntityKind::Doctor).len(), 1);
    }

    #[test]
    fn refresh_selection_picks_up_new_rows() {
        let mut state = DeskState::in_memory().unwrap();
        state
            .conn()
            .execute(
                "INSERT INTO patients (name, age, gender, contact) VALUES ('Alice', 30, 'F', '')",
                [],
            )
            .unwrap();
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Empty);

        state.refresh_selection(EntityKind::Patient).unwrap();
        assert_eq!(state.registry().state(EntityKind::Patient), RegistryState::Populated);
    }
}
