//! Report aggregation over the in-memory doctor and specialty collections.

use serde::{Deserialize, Serialize};

use crate::models::{Doctor, DoctorStatus, Specialty};

/// Doctor count for one specialty, in the order specialties were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyCount {
    pub specialty_name: String,
    pub count: u32,
}

/// Derived statistics shown on the Reports page. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: u32,
    pub active: u32,
    pub suspended: u32,
    pub per_specialty: Vec<SpecialtyCount>,
}

impl AggregateStats {
    /// Pie slices as `(label, value)`, active first.
    pub fn status_breakdown(&self) -> [(&'static str, u32); 2] {
        [
            (DoctorStatus::Active.label(), self.active),
            (DoctorStatus::Suspended.label(), self.suspended),
        ]
    }

    /// Largest per-specialty count (0 when there are no specialties).
    pub fn max_specialty_count(&self) -> u32 {
        self.per_specialty.iter().map(|s| s.count).max().unwrap_or(0)
    }
}

/// Compute report statistics.
///
/// Every specialty appears in `per_specialty`, in input order, even with zero
/// doctors. A doctor whose `specialty_id` is missing or matches no specialty
/// counts toward `total` and its status but toward no specialty bucket.
pub fn compute_stats(doctors: &[Doctor], specialties: &[Specialty]) -> AggregateStats {
    let count_status = |status: DoctorStatus| {
        doctors.iter().filter(|d| d.status == Some(status)).count() as u32
    };

    let per_specialty = specialties
        .iter()
        .map(|spec| SpecialtyCount {
            specialty_name: spec.name.clone(),
            count: doctors
                .iter()
                .filter(|d| d.specialty_id.as_deref() == Some(spec.id.as_str()))
                .count() as u32,
        })
        .collect();

    AggregateStats {
        total: doctors.len() as u32,
        active: count_status(DoctorStatus::Active),
        suspended: count_status(DoctorStatus::Suspended),
        per_specialty,
    }
}
