//! Explicit handle around the single long-lived store connection.
//!
//! Opened once at startup, borrowed by every repository, closed on exit.

use std::path::Path;

use rusqlite::Connection;

use super::{open_database, open_memory_database, DatabaseError};
use crate::config::ConnectionConfig;

pub struct Database {
    conn: Connection,
    label: String,
}

impl Database {
    /// Open the store described by `config` inside `data_dir`, creating the
    /// directory when needed.
    pub fn open(config: &ConnectionConfig, data_dir: &Path) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir).map_err(|source| DatabaseError::Location {
            path: data_dir.display().to_string(),
            source,
        })?;
        let path = config.database_path(data_dir);
        let conn = open_database(&path, config.password())?;
        let label = config.label();
        tracing::info!(store = %label, path = %path.display(), "Connected to database");
        Ok(Self { conn, label })
    }

    /// In-memory store (for testing)
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: open_memory_database()?,
            label: "memory".into(),
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<(), DatabaseError> {
        let label = self.label;
        self.conn.close().map_err(|(_, e)| DatabaseError::Sqlite(e))?;
        tracing::info!(store = %label, "Database closed");
        Ok(())
    }
}
