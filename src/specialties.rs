//! Specialty catalogue: add/remove and per-specialty doctor counts.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{Doctor, Specialty};

/// A specialty with the number of doctors referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyChip {
    pub specialty: Specialty,
    pub doctor_count: u32,
}

impl SpecialtyChip {
    /// `Name (count)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.specialty.name, self.doctor_count)
    }
}

/// Add a specialty from raw form input. Blank input is ignored and yields
/// `None`; otherwise the trimmed name is stored.
pub fn add_specialty(conn: &Connection, raw_name: &str) -> Result<Option<Specialty>, DatabaseError> {
    let name = raw_name.trim();
    if name.is_empty() {
        tracing::debug!("Ignoring blank specialty name");
        return Ok(None);
    }
    db::insert_specialty(conn, name).map(Some)
}

/// Doctor counts per specialty id. Doctors without a specialty reference are
/// not counted anywhere.
pub fn doctor_counts(doctors: &[Doctor]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for id in doctors
        .iter()
        .filter_map(|d| d.specialty_id.as_deref())
        .filter(|id| !id.is_empty())
    {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// One chip per specialty, in catalogue order.
pub fn chips(specialties: &[Specialty], doctors: &[Doctor]) -> Vec<SpecialtyChip> {
    let counts = doctor_counts(doctors);
    specialties
        .iter()
        .map(|s| SpecialtyChip {
            specialty: s.clone(),
            doctor_count: counts.get(s.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}
