//! Shared application state for the HTTP layer.
//!
//! Holds the store location, the process-wide theme and the report regions
//! handed out to open Reports pages. Each request opens its own connection;
//! `RwLock` guards the small amount of in-memory state.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config;
use crate::db;
use crate::models::ThemeMode;
use crate::reports::ReportRegion;
use crate::theme;

/// Rendered Reports pages whose snapshot can still be exported. The oldest
/// is dropped first.
pub const MAX_REPORT_SNAPSHOTS: usize = 64;

pub struct CoreState {
    /// Local document store.
    pub db_path: PathBuf,
    /// Where exported reports are written.
    pub exports_dir: PathBuf,
    theme: RwLock<ThemeMode>,
    /// Per-page snapshots keyed by the id embedded in that page's export form.
    report_snapshots: RwLock<VecDeque<(String, ReportRegion)>>,
}

impl CoreState {
    /// Open (and migrate) the store at `db_path` and load the theme from it.
    pub fn new(db_path: &Path, exports_dir: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(db_path)?;
        let mode = theme::load_theme(&conn)?;
        tracing::info!(db = %db_path.display(), theme = %mode, "State initialised");

        Ok(Self {
            db_path: db_path.to_path_buf(),
            exports_dir: exports_dir.to_path_buf(),
            theme: RwLock::new(mode),
            report_snapshots: RwLock::new(VecDeque::new()),
        })
    }

    /// State rooted at the configured data directory.
    pub fn from_config() -> Result<Self, CoreError> {
        Self::new(&config::database_path(), &config::exports_dir())
    }

    /// Open a connection to the store.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    // ── Theme ───────────────────────────────────────────────

    pub fn theme(&self) -> ThemeMode {
        self.theme.read().map(|t| *t).unwrap_or_default()
    }

    /// Flip light/dark and persist the new mode.
    ///
    /// The store is written before the in-memory value changes, so a failed
    /// write leaves both untouched.
    pub fn toggle_theme(&self) -> Result<ThemeMode, CoreError> {
        let mut guard = self.theme.write().map_err(|_| CoreError::LockPoisoned)?;
        let next = guard.toggled();
        let conn = self.open_db()?;
        theme::store_theme(&conn, next)?;
        *guard = next;
        tracing::info!(theme = %next, "Theme changed");
        Ok(next)
    }

    // ── Report snapshots ────────────────────────────────────

    /// Keep `region` for a later export and return its id.
    pub fn store_report(&self, region: ReportRegion) -> Result<String, CoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut guard = self
            .report_snapshots
            .write()
            .map_err(|_| CoreError::LockPoisoned)?;
        guard.push_back((id.clone(), region));
        while guard.len() > MAX_REPORT_SNAPSHOTS {
            guard.pop_front();
        }
        Ok(id)
    }

    /// Owned copy of the region rendered under `id`, if it is still held.
    pub fn report(&self, id: &str) -> Result<Option<ReportRegion>, CoreError> {
        let guard = self
            .report_snapshots
            .read()
            .map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, region)| region.clone()))
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
