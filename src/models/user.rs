use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account from the `users` collection. Accounts are created by the
/// public app; the dashboard only edits the name or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Favourite doctor ids.
    pub favorites: Vec<String>,
}
