//! Doctor pages: read-only list, manage (search/toggle/delete), add and edit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::db;
use crate::doctors::{
    search_by_name, specialty_label, specialty_names, toggle_status, DoctorForm,
};
use crate::models::{Doctor, DoctorStatus, Specialty, ThemeMode};
use crate::web::error::WebError;
use crate::web::pages::layout::{escape, render_page, status_chip, Nav};
use crate::web::types::WebContext;

const MANAGE_PATH: &str = "/doctors/manage";

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /doctors`: every doctor with the specialty resolved by name.
pub async fn list(State(ctx): State<WebContext>) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let doctors = db::list_doctors(&conn)?;
    let specialties = db::list_specialties(&conn)?;
    let names = specialty_names(&specialties);

    let rows: String = doctors
        .iter()
        .map(|d| {
            format!(
                "<tr><td>{avatar}</td><td>{name}</td><td>{specialty}</td><td>{email}</td><td>{phone}</td><td>{address}</td><td>{status}</td></tr>",
                avatar = avatar(d, 40),
                name = escape(&d.name),
                specialty = escape(specialty_label(d, &names)),
                email = escape(&d.email),
                phone = escape(&d.phone),
                address = escape(&d.address),
                status = status_chip(d.status),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="paper">
<h2>Total Doctors: {total}</h2>
<table>
<thead><tr><th></th><th>Name</th><th>Specialty</th><th>Email</th><th>Phone</th><th>Address</th><th>Status</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
</div>"#,
        total = doctors.len(),
    );
    Ok(Html(render_page(ctx.core.theme(), Nav::ViewDoctors, "View Doctors", &body)))
}

/// `GET /doctors/manage?q=`: searchable table with edit/toggle/delete.
pub async fn manage(
    State(ctx): State<WebContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let doctors = db::list_doctors(&conn)?;
    let specialties = db::list_specialties(&conn)?;
    let names = specialty_names(&specialties);
    let matches = search_by_name(&doctors, &query.q);

    let rows: String = matches
        .iter()
        .map(|d| {
            let id = escape(&d.id);
            let toggle_label = if d.is_active() { "Suspend" } else { "Activate" };
            format!(
                r#"<tr><td>{name}</td><td>{specialty}</td><td>{status}</td><td>
  <a class="button" href="/doctors/{id}/edit">Edit</a>
  <form class="inline" method="post" action="/doctors/{id}/toggle"><button type="submit" class="secondary">{toggle_label}</button></form>
  <form class="inline" method="post" action="/doctors/{id}/delete" onsubmit="return confirm('Delete this doctor?')"><button type="submit" class="danger">Delete</button></form>
</td></tr>"#,
                name = escape(&d.name),
                specialty = escape(specialty_label(d, &names)),
                status = status_chip(d.status),
            )
        })
        .collect();

    let empty = if matches.is_empty() {
        r#"<p class="muted">No doctors match.</p>"#
    } else {
        ""
    };

    let body = format!(
        r#"<div class="paper">
<form method="get" action="{MANAGE_PATH}">
  <input type="search" name="q" value="{q}" placeholder="Search by name">
  <button type="submit">Search</button>
</form>
</div>
<div class="paper">
<table>
<thead><tr><th>Name</th><th>Specialty</th><th>Status</th><th>Actions</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
{empty}
</div>"#,
        q = escape(&query.q),
    );
    Ok(Html(render_page(ctx.core.theme(), Nav::ManageDoctors, "Manage Doctors", &body)))
}

/// `GET /doctors/new`
pub async fn new_form(State(ctx): State<WebContext>) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let specialties = db::list_specialties(&conn)?;
    Ok(Html(form_page(
        ctx.core.theme(),
        FormMode::Create,
        &DoctorForm::default(),
        &specialties,
        None,
    )))
}

/// `POST /doctors/new`
pub async fn create(
    State(ctx): State<WebContext>,
    Form(form): Form<DoctorForm>,
) -> Result<Response, WebError> {
    let conn = ctx.core.open_db()?;
    match form.clone().into_fields() {
        Ok(fields) => {
            db::insert_doctor(&conn, &fields)?;
            Ok(Redirect::to(MANAGE_PATH).into_response())
        }
        Err(e) => {
            let specialties = db::list_specialties(&conn)?;
            let html = form_page(
                ctx.core.theme(),
                FormMode::Create,
                &form,
                &specialties,
                Some(&e.to_string()),
            );
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
    }
}

/// `GET /doctors/:id/edit`
pub async fn edit_form(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let doctor = find_doctor(&conn, &id)?;
    let specialties = db::list_specialties(&conn)?;
    Ok(Html(form_page(
        ctx.core.theme(),
        FormMode::Edit(&doctor.id),
        &DoctorForm::from_doctor(&doctor),
        &specialties,
        None,
    )))
}

/// `POST /doctors/:id/edit`
pub async fn update(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
    Form(form): Form<DoctorForm>,
) -> Result<Response, WebError> {
    let conn = ctx.core.open_db()?;
    match form.clone().into_fields() {
        Ok(fields) => {
            db::update_doctor(&conn, &id, &fields)?;
            Ok(Redirect::to(MANAGE_PATH).into_response())
        }
        Err(e) => {
            // Surface an unknown id before the validation message.
            find_doctor(&conn, &id)?;
            let specialties = db::list_specialties(&conn)?;
            let html = form_page(
                ctx.core.theme(),
                FormMode::Edit(&id),
                &form,
                &specialties,
                Some(&e.to_string()),
            );
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
    }
}

/// `POST /doctors/:id/toggle`
pub async fn toggle(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    toggle_status(&conn, &id)?;
    Ok(Redirect::to(MANAGE_PATH))
}

/// `POST /doctors/:id/delete`
pub async fn delete(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    db::delete_doctor(&conn, &id)?;
    Ok(Redirect::to(MANAGE_PATH))
}

fn find_doctor(conn: &rusqlite::Connection, id: &str) -> Result<Doctor, WebError> {
    db::get_doctor(conn, id)?.ok_or_else(|| WebError::NotFound(format!("Doctor {id} not found")))
}

enum FormMode<'a> {
    Create,
    Edit(&'a str),
}

fn avatar(doctor: &Doctor, size: u32) -> String {
    let style = format!("width:{size}px;height:{size}px;font-size:{}px", size / 2);
    if doctor.photo_url.is_empty() {
        let initial = doctor
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        format!(r#"<span class="avatar" style="{style}">{}</span>"#, escape(&initial))
    } else {
        format!(
            r#"<img class="avatar" style="{style}" src="{}" alt="{}">"#,
            escape(&doctor.photo_url),
            escape(&doctor.name)
        )
    }
}

fn form_page(
    theme: ThemeMode,
    mode: FormMode<'_>,
    form: &DoctorForm,
    specialties: &[Specialty],
    error: Option<&str>,
) -> String {
    let (nav, title, action, submit) = match &mode {
        FormMode::Create => (Nav::AddDoctor, "Add Doctor", "/doctors/new".to_string(), "Add Doctor"),
        FormMode::Edit(id) => (
            Nav::ManageDoctors,
            "Edit Doctor",
            format!("/doctors/{}/edit", escape(id)),
            "Save Changes",
        ),
    };

    let specialty_options: String = specialties
        .iter()
        .map(|s| {
            let selected = if s.id == form.specialty_id { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape(&s.id),
                escape(&s.name)
            )
        })
        .collect();

    let status_options: String = [DoctorStatus::Active, DoctorStatus::Suspended]
        .iter()
        .map(|s| {
            let selected = if s.as_str() == form.status { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, s.as_str(), s.label())
        })
        .collect();

    let avatar_block = match mode {
        FormMode::Edit(_) => {
            let preview = Doctor {
                id: String::new(),
                name: form.name.clone(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                description: String::new(),
                photo_url: form.photo_url.clone(),
                specialty_id: None,
                latitude: None,
                longitude: None,
                status: None,
            };
            avatar(&preview, 72)
        }
        FormMode::Create => String::new(),
    };

    let error_block = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="paper">
{avatar_block}
{error_block}
<form method="post" action="{action}">
  <label for="name">Name</label><input id="name" name="name" value="{name}" required>
  <label for="email">Email</label><input id="email" name="email" type="email" value="{email}">
  <label for="phone">Phone</label><input id="phone" name="phone" value="{phone}">
  <label for="address">Address</label><input id="address" name="address" value="{address}">
  <label for="description">Description</label><textarea id="description" name="description" rows="3">{description}</textarea>
  <label for="photo_url">Photo URL</label><input id="photo_url" name="photo_url" value="{photo_url}">
  <label for="specialty_id">Specialty</label>
  <select id="specialty_id" name="specialty_id"><option value="">None</option>{specialty_options}</select>
  <label for="latitude">Latitude</label><input id="latitude" name="latitude" value="{latitude}">
  <label for="longitude">Longitude</label><input id="longitude" name="longitude" value="{longitude}">
  <label for="status">Status</label>
  <select id="status" name="status">{status_options}</select>
  <p><button type="submit">{submit}</button></p>
</form>
</div>"#,
        name = escape(&form.name),
        email = escape(&form.email),
        phone = escape(&form.phone),
        address = escape(&form.address),
        description = escape(&form.description),
        photo_url = escape(&form.photo_url),
        latitude = escape(&form.latitude),
        longitude = escape(&form.longitude),
    );
    render_page(theme, nav, title, &body)
}
