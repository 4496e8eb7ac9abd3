use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;

use crate::db;
use crate::users::{rename_user, UserRow};
use crate::web::error::WebError;
use crate::web::pages::layout::{escape, render_page, Nav};
use crate::web::types::WebContext;

const USERS_PATH: &str = "/users";

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    pub name: String,
}

/// `GET /users`
pub async fn list(State(ctx): State<WebContext>) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let users = db::list_users(&conn)?;

    let rows: String = users
        .iter()
        .map(|u| {
            let row = UserRow::from(u);
            let id = escape(&row.id);
            // Prefill only a real name, not the placeholder.
            let current_name = escape(u.name.as_deref().unwrap_or_default());
            format!(
                r#"<tr><td>{id}</td><td>{email}</td><td>{name}</td><td>{created}</td><td>{favorites}</td><td>
  <form class="inline" method="post" action="{USERS_PATH}/{id}/name"><input name="name" value="{current_name}" placeholder="Name"><button type="submit">Save</button></form>
  <form class="inline" method="post" action="{USERS_PATH}/{id}/delete" onsubmit="return confirm('Delete this user?')"><button type="submit" class="danger">Delete</button></form>
</td></tr>"#,
                email = escape(&row.email),
                name = escape(&row.name),
                created = escape(&row.created_at),
                favorites = escape(&row.favorites),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="paper">
<table>
<thead><tr><th>ID</th><th>Email</th><th>Name</th><th>Created</th><th>Favorites</th><th>Actions</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
</div>"#
    );
    Ok(Html(render_page(ctx.core.theme(), Nav::Users, "Manage Users", &body)))
}

/// `POST /users/:id/name`
pub async fn rename(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
    Form(form): Form<RenameForm>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    rename_user(&conn, &id, &form.name)?;
    Ok(Redirect::to(USERS_PATH))
}

/// `POST /users/:id/delete`
pub async fn delete(
    State(ctx): State<WebContext>,
    Path(id): Path<String>,
) -> Result<Redirect, WebError> {
    let conn = ctx.core.open_db()?;
    db::delete_user(&conn, &id)?;
    Ok(Redirect::to(USERS_PATH))
}
