use thiserror::Error;

use crate::db::DatabaseError;

/// Failures reported by desk operations. Every variant is surfaced to the
/// user as a single message; none is retried.
#[derive(Error, Debug)]
pub enum DeskError {
    /// A required field is missing or out of range.
    #[error("{0}")]
    Validation(String),

    /// Text that must be a whole number is not one.
    #[error("{field} must be a number (got '{value}')")]
    NumericParse { field: &'static str, value: String },

    #[error("Invalid date '{0}'. Use yyyy-MM-dd HH:mm")]
    DateParse(String),

    /// Operation needs records that do not exist yet.
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl DeskError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Fatal failures that end the process with a non-zero exit code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("DB Connection failed: {0}")]
    Connection(#[from] DatabaseError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
