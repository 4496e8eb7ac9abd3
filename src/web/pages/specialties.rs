//! Specialty catalogue page: add form, chips with doctor counts, and either
//! the selected specialty's doctors or the full numbered list.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;

use crate::db;
use crate::specialties::{add_specialty, chips};
use crate::web::error::WebError;
use crate::web::pages::layout::{escape, render_page, status_chip, Nav};
use crate::web::types::WebContext;

const SPECIALTIES_PATH: &str = "/specialties";

#[derive(Debug, Default, Deserialize)]
pub struct SpecialtyQuery {
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSpecialtyForm {
    #[serde(default)]
    pub name: String,
}

/// `GET /specialties?selected=`
pub async fn show(
    State(ctx): State<WebContext>,
    Query(query): Query<SpecialtyQuery>,
) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let specialties = db::list_specialties(&conn)?;
    let doctors = db::list_doctors(&conn)?;
    let selected = query.selected.filter(|s| !s.is_empty());

    let all_class = if selected.is_none() { " class=\"selected\"" } else { "" };
    let chip_links: String = chips(&specialties, &doctors)
        .iter()
        .map(|chip| {
            let class = if selected.as_deref() == Some(chip.specialty.id.as_str()) {
                " class=\"selected\""
            } else {
                ""
            };
            format!(
                r#"<a href="{SPECIALTIES_PATH}?selected={}"{class}>{}</a>"#,
                escape(&chip.specialty.id),
                escape(&chip.label())
            )
        })
        .collect();

    let detail = match &selected {
        Some(id) => {
            let specialty = specialties
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| WebError::NotFound(format!("Specialty {id} not found")))?;
            let members = db::list_doctors_by_specialty(&conn, id)?;
            let rows: String = members
                .iter()
                .map(|d| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                        escape(&d.name),
                        escape(&d.email),
                        status_chip(d.status)
                    )
                })
                .collect();
            let empty = if members.is_empty() {
                r#"<p class="muted">No doctors in this specialty.</p>"#
            } else {
                ""
            };
            format!(
                r#"<h2>{name}</h2>
<table><thead><tr><th>Name</th><th>Email</th><th>Status</th></tr></thead><tbody>{rows}</tbody></table>
{empty}"#,
                name = escape(&specialty.name),
            )
        }
        None => {
            let rows: String = specialties
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    format!(
                        r#"<tr><td>{n}</td><td>{name}</td><td>
  <form class="inline" method="post" action="{SPECIALTIES_PATH}/{id}/delete" onsubmit="return confirm('Delete this specialty?')"><button type="submit" class="danger">Delete</button></form>
</td></tr>"#,
                        n = i + 1,
                        name = escape(&s.name),
                        id = escape(&s.id),
                    )
                })
                .collect();
            format!(
                r#"<h2>All Specialties</h2>
<table><thead><tr><th>#</th><th>Name</th><th></th></tr></thead><tbody>{rows}</tbody></table>"#
            )
        }
    };

    let body = format!(
        r#"<div class="paper">
<h2>Total Specialties: {total}</h2>
<form method="post" action="{SPECIALTIES_PATH}">
  <input name="name" placeholder="New specialty">
  <button type="submit">Add</button>
</form>
</div>
<div class="paper chips">
<a href="{SPECIALTIES_PATH}"{all_class}>All</a>
{chip_links}
</div>
<div class="paper">
{detail}
</div>"#,
        total = specialties.len(),
    );
    Ok(Html(render_page(ctx.core.theme(), Nav::Specialties, "Specialties", &body)))
}

/// `POST /specialties`: blank names are ignored.
pub async fn create(
    State(ctx): State<WebContext>,
    Form(form): Form<NewSpecialtyForm>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    add_specialty(&conn, &form.name)?;
    Ok(Redirect::to(SPECIALTIES_PATH))
}

/// `POST /specialties/:id/delete`: doctors keep their (now dangling)
/// reference.
pub async fn delete(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    db::delete_specialty(&conn, &id)?;
    Ok(Redirect::to(SPECIALTIES_PATH))
}
