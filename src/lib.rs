pub mod commands;
pub mod config;
pub mod console;
pub mod db;
pub mod desk_state;
pub mod error;
pub mod forms;
pub mod models;
pub mod selection;
pub mod table;

use std::io;

use tracing_subscriber::EnvFilter;

use crate::config::ConnectionConfig;
use crate::desk_state::DeskState;
use crate::error::AppError;

/// Start the desk: connect once, serve console commands until `quit` or end
/// of input, then close the connection. Configuration or connection
/// failures are fatal.
pub fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let connection = ConnectionConfig::load()?;
    tracing::debug!(?connection, "Connection settings loaded");

    let mut state = DeskState::open(&connection, &config::app_data_dir())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    console::run(&mut state, stdin.lock(), &mut stdout.lock())?;

    state.close()?;
    Ok(())
}
