//! User account listing helpers. Accounts are created by the public app;
//! the dashboard only renames and deletes them.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::User;

/// Placeholder for absent values in the users table.
pub const MISSING: &str = "—";

/// One rendered row of the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub favorites: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: or_missing(user.email.as_deref()),
            name: or_missing(user.name.as_deref()),
            created_at: format_created_at(user.created_at),
            favorites: user.favorites.join(", "),
        }
    }
}

fn or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

pub fn format_created_at(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Rename a user. The name is trimmed; a blank name clears it to empty.
pub fn rename_user(conn: &Connection, id: &str, raw_name: &str) -> Result<(), DatabaseError> {
    db::update_user_name(conn, id, raw_name.trim())
}
