use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

/// Latest schema version shipped with this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Open a SQLite connection to the given path and run migrations.
///
/// A `key` turns on SQLCipher encryption for the file; it must be the
/// first statement issued on the connection.
pub fn open_database(path: &Path, key: Option<&str>) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    if let Some(key) = key {
        conn.pragma_update(None, "key", key)?;
    }
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

// Cascading deletes from patients and doctors depend on foreign_keys.
fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.pragma_update(None, "journal_mode", "DELETE")?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(())
}

const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    include_str!("../../resources/migrations/001_initial.sql"),
)];

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn);
    let pending = MIGRATIONS.iter().filter(|(version, _)| *version > current);

    for &(version, sql) in pending {
        tracing::info!(from = current, to = version, "Migrating clinic schema");
        conn.execute_batch(sql)
            .map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

/// Recorded schema version; 0 for a fresh file where `schema_version` is
/// missing or has no rows.
pub fn schema_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

/// Names of the user tables, sorted.
#[cfg(test)]
pub(crate) fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
