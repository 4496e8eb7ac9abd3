use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::web::error::WebError;
use crate::web::pages::layout::local_target;
use crate::web::types::WebContext;

#[derive(Debug, Deserialize)]
pub struct ThemeToggleForm {
    pub back: Option<String>,
}

/// `POST /theme/toggle`: flip light/dark and return to the calling page.
pub async fn toggle(
    State(ctx): State<WebContext>,
    Form(form): Form<ThemeToggleForm>,
) -> Result<Redirect, WebError> {
    ctx.core.toggle_theme()?;
    Ok(Redirect::to(local_target(form.back.as_deref())))
}
