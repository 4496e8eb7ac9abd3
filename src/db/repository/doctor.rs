use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Doctor, DoctorFields, DoctorStatus};

const DOCTOR_COLUMNS: &str = "id, name, email, phone, address, description, photo_url,
     specialty_id, latitude, longitude, status";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        description: row.get(5)?,
        photo_url: row.get(6)?,
        specialty_id: row
            .get::<_, Option<String>>(7)?
            .filter(|s| !s.is_empty()),
        latitude: row.get(8)?,
        longitude: row.get(9)?,
        status: row
            .get::<_, Option<String>>(10)?
            .and_then(|s| s.parse::<DoctorStatus>().ok()),
    })
}

/// All doctors in insertion order.
pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY created_at, rowid"
    ))?;
    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Doctors whose `specialty_id` equals the given id.
pub fn list_doctors_by_specialty(
    conn: &Connection,
    specialty_id: &str,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE specialty_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let rows = stmt.query_map(params![specialty_id], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_doctor(conn: &Connection, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
        params![id],
        doctor_from_row,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Insert a new doctor. The store assigns the id.
pub fn insert_doctor(conn: &Connection, fields: &DoctorFields) -> Result<String, DatabaseError> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO doctors (id, name, email, phone, address, description, photo_url,
         specialty_id, latitude, longitude, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id,
            fields.name,
            fields.email,
            fields.phone,
            fields.address,
            fields.description,
            fields.photo_url,
            fields.specialty_id,
            fields.latitude,
            fields.longitude,
            fields.status.as_str(),
        ],
    )?;
    tracing::info!(doctor_id = %id, "Doctor created");
    Ok(id)
}

/// Replace every editable field of an existing doctor.
pub fn update_doctor(
    conn: &Connection,
    id: &str,
    fields: &DoctorFields,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET name = ?2, email = ?3, phone = ?4, address = ?5,
         description = ?6, photo_url = ?7, specialty_id = ?8, latitude = ?9,
         longitude = ?10, status = ?11
         WHERE id = ?1",
        params![
            id,
            fields.name,
            fields.email,
            fields.phone,
            fields.address,
            fields.description,
            fields.photo_url,
            fields.specialty_id,
            fields.latitude,
            fields.longitude,
            fields.status.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.into(),
        });
    }
    tracing::info!(doctor_id = %id, "Doctor updated");
    Ok(())
}

pub fn update_doctor_status(
    conn: &Connection,
    id: &str,
    status: DoctorStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.into(),
        });
    }
    tracing::info!(doctor_id = %id, status = status.as_str(), "Doctor status changed");
    Ok(())
}

/// Delete a doctor. Deleting an unknown id is a no-op.
pub fn delete_doctor(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    tracing::info!(doctor_id = %id, "Doctor deleted");
    Ok(())
}
