use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

/// Application-level constants
pub const APP_NAME: &str = "ClinicDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File read from the app data directory when present.
pub const CONNECTION_FILE: &str = "connection.json";

/// Overrides the configured store password.
pub const PASSWORD_ENV: &str = "CLINIC_DESK_DB_PASSWORD";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "clinic_desk_lib=info,clinic_desk=info,warn"
}

/// Get the application data directory
/// ~/ClinicDesk/ on all platforms, falling back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid connection setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Connection options: `{host, port, database, user, password}`.
///
/// The store is an embedded SQLite file, so only `database` (file name)
/// and `password` (SQLCipher key) reach the engine. Host, port and user
/// describe the connection in logs and dialogs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    password: Zeroizing<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            database: "hospital_db".into(),
            user: "postgres".into(),
            password: Zeroizing::new(String::new()),
        }
    }
}

// Hand-written so the password never lands in logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "<none>" } else { "<set>" })
            .finish()
    }
}

impl ConnectionConfig {
    /// Load from `<app_data_dir>/connection.json`, then apply environment
    /// overrides and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = app_data_dir().join(CONNECTION_FILE);
        let mut config = Self::from_file_or_default(&path)?;
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            config.set_password(password);
        }
        config.validate()?;
        Ok(config)
    }

    /// Defaults when the file does not exist; any other read failure is an error.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn set_password(&mut self, password: String) {
        self.password = Zeroizing::new(password);
    }

    /// Store key, `None` for an unencrypted store.
    pub fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(self.password.as_str())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database",
                reason: "must not be empty".into(),
            });
        }
        if self.database.contains(['/', '\\']) || self.database.contains("..") {
            return Err(ConfigError::Invalid {
                field: "database",
                reason: format!("`{}` must be a plain name, not a path", self.database),
            });
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user",
                reason: "must not be empty".into(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                field: "port",
                reason: "must be between 1 and 65535".into(),
            });
        }
        Ok(())
    }

    /// Store file for this configuration inside `data_dir`.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.db", self.database))
    }

    /// `user@host:port/database`, safe to log.
    pub fn label(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}
