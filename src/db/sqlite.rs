use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

/// Ordered schema steps. Each script records its own version row.
const MIGRATIONS: [(i64, &str); 2] = [
    (1, include_str!("../../resources/migrations/001_initial.sql")),
    (2, include_str!("../../resources/migrations/002_user_preferences.sql")),
];

/// Open the directory store at `path`, creating its folder if needed, and
/// bring the schema up to date.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DatabaseError::ConstraintViolation(format!(
                "Cannot create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    prepare(Connection::open(path)?)
}

/// Throwaway store for tests.
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection, DatabaseError> {
    // Foreign keys stay off: a doctor may reference a deleted specialty.
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
    migrate(&conn)?;
    Ok(conn)
}

/// Apply every migration newer than the stored version, each in its own
/// transaction. Returns how many ran.
pub fn migrate(conn: &Connection) -> Result<usize, DatabaseError> {
    let current = schema_version(conn)?;
    let mut applied = 0;

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .and_then(|_| tx.commit())
            .map_err(|e| DatabaseError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        tracing::info!(version, "Schema migrated");
        applied += 1;
    }

    Ok(applied)
}

/// Highest applied migration, 0 for a blank store.
pub fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
