//! Process-wide light/dark preference.
//!
//! Initialised from the store at startup and written through on every change.

use std::str::FromStr;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::ThemeMode;

pub const THEME_PREFERENCE_KEY: &str = "theme_mode";

/// Read the stored mode. Only `light` and `dark` are accepted; a missing or
/// unrecognised value yields `Light`.
pub fn load_theme(conn: &Connection) -> Result<ThemeMode, DatabaseError> {
    let stored = db::get_user_preference(conn, THEME_PREFERENCE_KEY)?;
    Ok(stored
        .and_then(|v| ThemeMode::from_str(v.trim()).ok())
        .unwrap_or_default())
}

pub fn store_theme(conn: &Connection, mode: ThemeMode) -> Result<(), DatabaseError> {
    db::set_user_preference(conn, THEME_PREFERENCE_KEY, mode.as_str())
}
