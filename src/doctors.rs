//! Doctor directory: form mapping, search and status toggling.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::models::{Doctor, DoctorFields, DoctorStatus, Specialty};

/// Label for a doctor whose specialty reference matches nothing.
pub const UNKNOWN_SPECIALTY: &str = "Unknown";

/// Raw add/edit form submission. Every field arrives as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub photo_url: String,
    pub specialty_id: String,
    pub latitude: String,
    pub longitude: String,
    pub status: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DoctorFormError {
    #[error("Name is required")]
    MissingName,
    #[error("Unknown status: {0}")]
    InvalidStatus(String),
}

impl DoctorForm {
    /// Prefill from a stored record; an unknown status shows as active.
    pub fn from_doctor(doctor: &Doctor) -> Self {
        let coord = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        Self {
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            phone: doctor.phone.clone(),
            address: doctor.address.clone(),
            description: doctor.description.clone(),
            photo_url: doctor.photo_url.clone(),
            specialty_id: doctor.specialty_id.clone().unwrap_or_default(),
            latitude: coord(doctor.latitude),
            longitude: coord(doctor.longitude),
            status: doctor.status.unwrap_or_default().as_str().to_string(),
        }
    }

    /// Map the submission to store fields.
    ///
    /// Blank status means active. Coordinates that do not parse as numbers
    /// are stored as absent.
    pub fn into_fields(self) -> Result<DoctorFields, DoctorFormError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DoctorFormError::MissingName);
        }

        let status = match self.status.trim() {
            "" => DoctorStatus::default(),
            s => DoctorStatus::from_str(s)
                .map_err(|_| DoctorFormError::InvalidStatus(s.to_string()))?,
        };

        let specialty_id = Some(self.specialty_id.trim().to_string()).filter(|s| !s.is_empty());

        Ok(DoctorFields {
            name,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            description: self.description,
            photo_url: self.photo_url.trim().to_string(),
            specialty_id,
            latitude: parse_coordinate(&self.latitude),
            longitude: parse_coordinate(&self.longitude),
            status,
        })
    }
}

/// Longest leading decimal literal, the way a browser's `parseFloat` reads
/// form text: "51.5N" is 51.5, "north" is nothing.
static LEADING_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").ok()
});

fn parse_coordinate(raw: &str) -> Option<f64> {
    let number = LEADING_NUMBER.as_ref()?.find(raw.trim_start())?;
    number.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Case-insensitive substring match on the doctor's name. A blank query
/// matches everyone.
pub fn search_by_name<'a>(doctors: &'a [Doctor], query: &str) -> Vec<&'a Doctor> {
    let needle = query.trim().to_lowercase();
    doctors
        .iter()
        .filter(|d| needle.is_empty() || d.name.to_lowercase().contains(&needle))
        .collect()
}

/// Specialty id → name.
pub fn specialty_names(specialties: &[Specialty]) -> HashMap<&str, &str> {
    specialties
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect()
}

/// Display name of the doctor's specialty, or [`UNKNOWN_SPECIALTY`].
pub fn specialty_label<'a>(doctor: &Doctor, names: &HashMap<&str, &'a str>) -> &'a str {
    doctor
        .specialty_id
        .as_deref()
        .and_then(|id| names.get(id).copied())
        .unwrap_or(UNKNOWN_SPECIALTY)
}

/// Flip a doctor's status: active becomes suspended, anything else becomes
/// active. Returns the new status.
pub fn toggle_status(conn: &Connection, id: &str) -> Result<DoctorStatus, DatabaseError> {
    let doctor = db::get_doctor(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "Doctor".into(),
        id: id.into(),
    })?;

    let next = match doctor.status {
        Some(status) => status.toggled(),
        None => DoctorStatus::Active,
    };
    db::update_doctor_status(conn, id, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn form(name: &str) -> DoctorForm {
        DoctorForm {
            name: name.into(),
            email: "grey@clinic.test".into(),
            latitude: "51.5".into(),
            longitude: "-0.12".into(),
            ..Default::default()
        }
    }

    fn doctor(name: &str, specialty_id: Option<&str>) -> Doctor {
        Doctor {
            id: name.to_lowercase(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            description: String::new(),
            photo_url: String::new(),
            specialty_id: specialty_id.map(str::to_string),
            latitude: None,
            longitude: None,
            status: Some(DoctorStatus::Active),
        }
    }

    #[test]
    fn blank_status_defaults_to_active() {
        let fields = form("Grey").into_fields().unwrap();
        assert_eq!(fields.status, DoctorStatus::Active);
        assert_eq!(fields.latitude, Some(51.5));
        assert_eq!(fields.longitude, Some(-0.12));
        assert_eq!(fields.specialty_id, None);
    }

    #[test]
    fn unparseable_coordinates_are_absent() {
        let mut f = form("Grey");
        f.latitude = "north".into();
        f.longitude = String::new();
        let fields = f.into_fields().unwrap();
        assert_eq!(fields.latitude, None);
        assert_eq!(fields.longitude, None);
    }

    #[test]
    fn coordinates_keep_leading_number_before_trailing_text() {
        assert_eq!(parse_coordinate("51.5N"), Some(51.5));
        assert_eq!(parse_coordinate(" 51.5abc"), Some(51.5));
        assert_eq!(parse_coordinate("-0.12 W"), Some(-0.12));
        assert_eq!(parse_coordinate(".5"), Some(0.5));
        assert_eq!(parse_coordinate("1e2x"), Some(100.0));
        assert_eq!(parse_coordinate("12."), Some(12.0));
        assert_eq!(parse_coordinate("N51.5"), None);
        assert_eq!(parse_coordinate("-"), None);

        let mut f = form("Grey");
        f.latitude = "51.5N".into();
        assert_eq!(f.into_fields().unwrap().latitude, Some(51.5));
    }

    #[test]
    fn missing_name_is_rejected() {
        assert_eq!(form("  ").into_fields().unwrap_err(), DoctorFormError::MissingName);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut f = form("Grey");
        f.status = "retired".into();
        assert_eq!(
            f.into_fields().unwrap_err(),
            DoctorFormError::InvalidStatus("retired".into())
        );
    }

    #[test]
    fn prefill_treats_unknown_status_as_active() {
        let mut d = doctor("Grey", Some("s1"));
        d.status = None;
        d.latitude = Some(10.25);
        let f = DoctorForm::from_doctor(&d);
        assert_eq!(f.status, "active");
        assert_eq!(f.specialty_id, "s1");
        assert_eq!(f.latitude, "10.25");
        assert_eq!(f.longitude, "");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let doctors = vec![doctor("Meredith Grey", None), doctor("Derek Shepherd", None)];
        let hits = search_by_name(&doctors, "GREY");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Meredith Grey");
        assert_eq!(search_by_name(&doctors, "").len(), 2);
        assert!(search_by_name(&doctors, "house").is_empty());
    }

    #[test]
    fn unmatched_specialty_reads_unknown() {
        let specialties = vec![Specialty { id: "s1".into(), name: "Cardiology".into() }];
        let names = specialty_names(&specialties);
        assert_eq!(specialty_label(&doctor("A", Some("s1")), &names), "Cardiology");
        assert_eq!(specialty_label(&doctor("B", Some("gone")), &names), UNKNOWN_SPECIALTY);
        assert_eq!(specialty_label(&doctor("C", None), &names), UNKNOWN_SPECIALTY);
    }

    #[test]
    fn toggle_flips_and_recovers_unknown_status() {
        let conn = open_memory_database().unwrap();
        let id = db::insert_doctor(&conn, &form("Grey").into_fields().unwrap()).unwrap();

        assert_eq!(toggle_status(&conn, &id).unwrap(), DoctorStatus::Suspended);
        assert_eq!(toggle_status(&conn, &id).unwrap(), DoctorStatus::Active);

        conn.execute("UPDATE doctors SET status = 'on_leave' WHERE id = ?1", [&id])
            .unwrap();
        assert_eq!(toggle_status(&conn, &id).unwrap(), DoctorStatus::Active);
    }

    #[test]
    fn toggle_unknown_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            toggle_status(&conn, "missing"),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
