use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Specialty;

pub fn list_specialties(conn: &Connection) -> Result<Vec<Specialty>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name FROM specialties ORDER BY created_at, rowid")?;
    let rows = stmt.query_map([], |row| {
        Ok(Specialty {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_specialty(conn: &Connection, id: &str) -> Result<Option<Specialty>, DatabaseError> {
    conn.query_row(
        "SELECT id, name FROM specialties WHERE id = ?1",
        params![id],
        |row| {
            Ok(Specialty {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Insert a specialty. The name must already be trimmed and non-empty.
pub fn insert_specialty(conn: &Connection, name: &str) -> Result<Specialty, DatabaseError> {
    if name.trim().is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "Specialty name must not be empty".into(),
        ));
    }
    let specialty = Specialty {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
    };
    conn.execute(
        "INSERT INTO specialties (id, name) VALUES (?1, ?2)",
        params![specialty.id, specialty.name],
    )?;
    tracing::info!(specialty_id = %specialty.id, "Specialty created");
    Ok(specialty)
}

/// Delete a specialty. Doctors referencing it are left untouched.
pub fn delete_specialty(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM specialties WHERE id = ?1", params![id])?;
    tracing::info!(specialty_id = %id, "Specialty deleted");
    Ok(())
}
