use serde::{Deserialize, Serialize};

use super::enums::DoctorStatus;

/// A doctor record as stored in the `doctors` collection.
///
/// `status` is `None` when the stored value is not one of the enumerated
/// statuses; such records count toward totals but toward neither status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub photo_url: String,
    pub specialty_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<DoctorStatus>,
}

/// Field values for creating or replacing a doctor (id assigned by the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub photo_url: String,
    pub specialty_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: DoctorStatus,
}

impl Doctor {
    pub fn is_active(&self) -> bool {
        self.status == Some(DoctorStatus::Active)
    }
}
