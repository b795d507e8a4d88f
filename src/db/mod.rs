pub mod handle;
pub mod sqlite;
pub mod repository;

pub use handle::*;
pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Cannot prepare database location {path}: {source}")]
    Location {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DatabaseError {
    /// Classify a failed write, separating constraint violations (missing
    /// referenced rows, CHECK failures) from other SQLite failures.
    pub(crate) fn from_write(e: rusqlite::Error) -> Self {
        if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            let detail = match &e {
                rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
                other => other.to_string(),
            };
            return Self::ConstraintViolation(detail);
        }
        Self::Sqlite(e)
    }
}
