//! Page-level errors rendered as small HTML error pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::reports::ExportError;
use crate::web::pages::layout::escape;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::NotFound(detail) => (StatusCode::NOT_FOUND, detail.clone()),
            WebError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            WebError::Internal(detail) => {
                tracing::error!(detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{code}</title></head>
<body style="font-family:Roboto,Helvetica,Arial,sans-serif;padding:32px">
<h1>{code}</h1>
<p>{message}</p>
<p><a href="/">Back to dashboard</a></p>
</body>
</html>"#,
            code = status.as_u16(),
            message = escape(&message),
        );
        (status, Html(html)).into_response()
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => WebError::Internal("lock poisoned".into()),
            CoreError::Database(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for WebError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                WebError::NotFound(format!("{entity_type} {id} not found"))
            }
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<ExportError> for WebError {
    fn from(err: ExportError) -> Self {
        WebError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404_with_message() {
        let response = WebError::NotFound("Doctor d1 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Doctor d1 not found"));
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = WebError::BadRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = WebError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("An internal error occurred"));
        assert!(!body.contains("disk on fire"));
    }

    #[tokio::test]
    async fn message_is_escaped() {
        let response = WebError::BadRequest("<script>".into()).into_response();
        let body = body_text(response).await;
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn database_not_found_maps_to_404() {
        let err: WebError = DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: "d1".into(),
        }
        .into();
        assert!(matches!(err, WebError::NotFound(_)));
    }

    #[test]
    fn core_lock_error_maps_to_internal() {
        let err: WebError = CoreError::LockPoisoned.into();
        assert!(matches!(err, WebError::Internal(_)));
    }
}
