use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::User;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let favorites: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: row
            .get::<_, Option<String>>(3)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc)),
        // Malformed favourites render as an empty list rather than failing the page.
        favorites: serde_json::from_str(&favorites).unwrap_or_default(),
    })
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, name, created_at, favorites FROM users ORDER BY rowid",
    )?;
    let rows = stmt.query_map([], user_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_user(conn: &Connection, id: &str) -> Result<Option<User>, DatabaseError> {
    conn.query_row(
        "SELECT id, email, name, created_at, favorites FROM users WHERE id = ?1",
        params![id],
        user_from_row,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Insert an account document as written by the public app.
pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, email, name, created_at, favorites)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.email,
            user.name,
            user.created_at.map(|d| d.to_rfc3339()),
            serde_json::to_string(&user.favorites)?,
        ],
    )?;
    Ok(())
}

/// Update only the display name of a user.
pub fn update_user_name(conn: &Connection, id: &str, name: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET name = ?2 WHERE id = ?1",
        params![id, name],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.into(),
        });
    }
    tracing::info!(user_id = %id, "User renamed");
    Ok(())
}

pub fn delete_user(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}
