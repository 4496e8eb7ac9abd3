use axum::extract::State;
use axum::response::Html;

use crate::db;
use crate::web::error::WebError;
use crate::web::pages::layout::{render_page, Nav};
use crate::web::types::WebContext;

/// `GET /`: welcome card with directory counts.
pub async fn show(State(ctx): State<WebContext>) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let doctors = db::list_doctors(&conn)?.len();
    let specialties = db::list_specialties(&conn)?.len();
    let users = db::list_users(&conn)?.len();

    let body = format!(
        r#"<div class="paper">
  <h2>Welcome to the Doctor Directory admin dashboard</h2>
  <p class="muted">Manage doctors, specialties and user accounts, and export directory reports.</p>
  <p>{doctors} doctors · {specialties} specialties · {users} users</p>
  <p><a class="button" href="/doctors/new">Add Doctor</a> <a class="button" href="/reports">View Reports</a></p>
</div>"#
    );
    Ok(Html(render_page(ctx.core.theme(), Nav::Dashboard, "Dashboard", &body)))
}
