//! Dashboard router.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::core_state::CoreState;
use crate::web::error::WebError;
use crate::web::middleware;
use crate::web::pages;
use crate::web::types::WebContext;

/// Build the dashboard router over shared state.
pub fn app_router(core: Arc<CoreState>) -> Router {
    let ctx = WebContext::new(core);

    Router::new()
        .route("/", get(pages::dashboard::show))
        .route("/health", get(pages::health::check))
        .route("/doctors", get(pages::doctors::list))
        .route("/doctors/manage", get(pages::doctors::manage))
        .route(
            "/doctors/new",
            get(pages::doctors::new_form).post(pages::doctors::create),
        )
        .route(
            "/doctors/:id/edit",
            get(pages::doctors::edit_form).post(pages::doctors::update),
        )
        .route("/doctors/:id/toggle", post(pages::doctors::toggle))
        .route("/doctors/:id/delete", post(pages::doctors::delete))
        .route(
            "/specialties",
            get(pages::specialties::show).post(pages::specialties::create),
        )
        .route("/specialties/:id/delete", post(pages::specialties::delete))
        .route("/reports", get(pages::reports::show))
        .route("/reports/export", post(pages::reports::export))
        .route("/users", get(pages::users::list))
        .route("/users/:id/name", post(pages::users::rename))
        .route("/users/:id/delete", post(pages::users::delete))
        .route("/theme/toggle", post(pages::theme::toggle))
        .fallback(not_found)
        .with_state(ctx)
        // Every page is a fresh read of the store.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}

async fn not_found() -> WebError {
    WebError::NotFound("Page not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::db;
    use crate::models::{DoctorFields, DoctorStatus, User};

    struct TestApp {
        _dir: tempfile::TempDir,
        core: Arc<CoreState>,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let core = CoreState::new(
                &dir.path().join("database").join("test.db"),
                &dir.path().join("exports"),
            )
            .unwrap();
            Self {
                _dir: dir,
                core: Arc::new(core),
            }
        }

        fn router(&self) -> Router {
            app_router(self.core.clone())
        }

        async fn get(&self, uri: &str) -> Response {
            self.router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap()
        }

        async fn post_form(&self, uri: &str, body: &str) -> Response {
            self.router()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .header("content-type", "application/x-www-form-urlencoded")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap()
        }

        fn seed_doctor(&self, name: &str, specialty_id: Option<&str>, status: DoctorStatus) -> String {
            let conn = self.core.open_db().unwrap();
            db::insert_doctor(
                &conn,
                &DoctorFields {
                    name: name.into(),
                    email: format!("{}@clinic.test", name.to_lowercase()),
                    phone: String::new(),
                    address: String::new(),
                    description: String::new(),
                    photo_url: String::new(),
                    specialty_id: specialty_id.map(str::to_string),
                    latitude: None,
                    longitude: None,
                    status,
                },
            )
            .unwrap()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn snapshot_id(html: &str) -> String {
        let marker = r#"name="snapshot" value=""#;
        let start = html.find(marker).unwrap() + marker.len();
        let len = html[start..].find('"').unwrap();
        html[start..start + len].to_string()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn health_returns_ok_json() {
        let app = TestApp::new();
        let response = app.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn pages_are_not_cached() {
        let app = TestApp::new();
        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = TestApp::new();
        assert_eq!(app.get("/nowhere").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn view_doctors_shows_total_and_unknown_specialty() {
        let app = TestApp::new();
        app.seed_doctor("Grey", Some("missing"), DoctorStatus::Active);
        app.seed_doctor("Shepherd", None, DoctorStatus::Suspended);

        let body = body_text(app.get("/doctors").await).await;
        assert!(body.contains("Total Doctors: 2"));
        assert!(body.contains("Unknown"));
    }

    #[tokio::test]
    async fn manage_search_filters_by_name() {
        let app = TestApp::new();
        app.seed_doctor("Meredith Grey", None, DoctorStatus::Active);
        app.seed_doctor("Derek Shepherd", None, DoctorStatus::Active);

        let body = body_text(app.get("/doctors/manage?q=grey").await).await;
        assert!(body.contains("Meredith Grey"));
        assert!(!body.contains("Derek Shepherd"));
    }

    #[tokio::test]
    async fn create_doctor_defaults_to_active() {
        let app = TestApp::new();
        let response = app
            .post_form("/doctors/new", "name=Grey&email=grey%40clinic.test&latitude=51.5&longitude=abc")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/doctors/manage");

        let conn = app.core.open_db().unwrap();
        let doctors = db::list_doctors(&conn).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].status, Some(DoctorStatus::Active));
        assert_eq!(doctors[0].latitude, Some(51.5));
        assert_eq!(doctors[0].longitude, None);
    }

    #[tokio::test]
    async fn create_without_name_rerenders_form() {
        let app = TestApp::new();
        let response = app.post_form("/doctors/new", "name=&email=x%40y.test").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Name is required"));
    }

    #[tokio::test]
    async fn edit_prefills_and_updates() {
        let app = TestApp::new();
        let id = app.seed_doctor("Grey", None, DoctorStatus::Suspended);

        let body = body_text(app.get(&format!("/doctors/{id}/edit")).await).await;
        assert!(body.contains(r#"value="Grey""#));
        assert!(body.contains(r#"<option value="suspended" selected>"#));

        let response = app
            .post_form(&format!("/doctors/{id}/edit"), "name=Grey-Sloan&status=active")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let conn = app.core.open_db().unwrap();
        let doctor = db::get_doctor(&conn, &id).unwrap().unwrap();
        assert_eq!(doctor.name, "Grey-Sloan");
        assert_eq!(doctor.status, Some(DoctorStatus::Active));
    }

    #[tokio::test]
    async fn edit_unknown_doctor_is_404() {
        let app = TestApp::new();
        assert_eq!(app.get("/doctors/missing/edit").await.status(), StatusCode::NOT_FOUND);
        let response = app.post_form("/doctors/missing/edit", "name=X").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn toggle_and_delete_doctor() {
        let app = TestApp::new();
        let id = app.seed_doctor("Grey", None, DoctorStatus::Active);

        let response = app.post_form(&format!("/doctors/{id}/toggle"), "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        {
            let conn = app.core.open_db().unwrap();
            let doctor = db::get_doctor(&conn, &id).unwrap().unwrap();
            assert_eq!(doctor.status, Some(DoctorStatus::Suspended));
        }

        app.post_form(&format!("/doctors/{id}/delete"), "").await;
        let conn = app.core.open_db().unwrap();
        assert!(db::get_doctor(&conn, &id).unwrap().is_none());
    }

    #[tokio::test]
    async fn specialties_add_ignores_blank_and_counts_doctors() {
        let app = TestApp::new();
        app.post_form("/specialties", "name=%20%20").await;
        app.post_form("/specialties", "name=%20Cardiology%20").await;

        let specialty_id = {
            let conn = app.core.open_db().unwrap();
            let specialties = db::list_specialties(&conn).unwrap();
            assert_eq!(specialties.len(), 1);
            assert_eq!(specialties[0].name, "Cardiology");
            specialties[0].id.clone()
        };
        app.seed_doctor("Grey", Some(&specialty_id), DoctorStatus::Active);

        let body = body_text(app.get("/specialties").await).await;
        assert!(body.contains("Total Specialties: 1"));
        assert!(body.contains("Cardiology (1)"));

        let body = body_text(app.get(&format!("/specialties?selected={specialty_id}")).await).await;
        assert!(body.contains("grey@clinic.test"));
    }

    #[tokio::test]
    async fn deleting_specialty_keeps_doctors() {
        let app = TestApp::new();
        app.post_form("/specialties", "name=Cardiology").await;
        let specialty_id = {
            let conn = app.core.open_db().unwrap();
            db::list_specialties(&conn).unwrap()[0].id.clone()
        };
        let doctor_id = app.seed_doctor("Grey", Some(&specialty_id), DoctorStatus::Active);

        app.post_form(&format!("/specialties/{specialty_id}/delete"), "").await;

        let conn = app.core.open_db().unwrap();
        assert!(db::list_specialties(&conn).unwrap().is_empty());
        let doctor = db::get_doctor(&conn, &doctor_id).unwrap().unwrap();
        assert_eq!(doctor.specialty_id.as_deref(), Some(specialty_id.as_str()));
    }

    #[tokio::test]
    async fn export_before_render_redirects_without_file() {
        let app = TestApp::new();
        let response = app.post_form("/reports/export", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/reports");
        assert!(!app.core.exports_dir.join("Doctor_Report.pdf").exists());
    }

    #[tokio::test]
    async fn export_after_render_downloads_pdf() {
        let app = TestApp::new();
        app.seed_doctor("Grey", None, DoctorStatus::Active);

        let page = app.get("/reports").await;
        assert_eq!(page.status(), StatusCode::OK);
        let html = body_text(page).await;
        assert!(html.contains("Export to PDF"));
        let snapshot = snapshot_id(&html);

        let response = app
            .post_form("/reports/export", &format!("snapshot={snapshot}"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Doctor_Report.pdf\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(app.core.exports_dir.join("Doctor_Report.pdf").exists());
    }

    #[tokio::test]
    async fn export_with_unknown_snapshot_redirects() {
        let app = TestApp::new();
        app.get("/reports").await;
        let response = app.post_form("/reports/export", "snapshot=stale").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/reports");
        assert!(!app.core.exports_dir.join("Doctor_Report.pdf").exists());
    }

    #[tokio::test]
    async fn interleaved_pages_export_what_each_one_showed() {
        let app = TestApp::new();

        // First admin opens the page on an empty directory
        let first = snapshot_id(&body_text(app.get("/reports").await).await);

        // Second admin adds a doctor and opens the page
        app.seed_doctor("Grey", None, DoctorStatus::Active);
        let second = snapshot_id(&body_text(app.get("/reports").await).await);
        assert_ne!(first, second);

        let response = app
            .post_form("/reports/export", &format!("snapshot={first}"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let first_region = app.core.report(&first).unwrap().unwrap();
        let second_region = app.core.report(&second).unwrap().unwrap();
        assert_eq!(first_region.stats.total, 0);
        assert_eq!(second_region.stats.total, 1);

        let response = app
            .post_form("/reports/export", &format!("snapshot={second}"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn users_table_uses_placeholders_and_renames() {
        let app = TestApp::new();
        {
            let conn = app.core.open_db().unwrap();
            db::insert_user(
                &conn,
                &User {
                    id: "u1".into(),
                    email: None,
                    name: None,
                    created_at: None,
                    favorites: vec!["d1".into(), "d2".into()],
                },
            )
            .unwrap();
        }

        let body = body_text(app.get("/users").await).await;
        assert!(body.contains("<td>—</td>"));
        assert!(body.contains("d1, d2"));

        let response = app.post_form("/users/u1/name", "name=Ana").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let conn = app.core.open_db().unwrap();
        assert_eq!(db::get_user(&conn, "u1").unwrap().unwrap().name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn theme_toggle_persists_and_redirects_back() {
        let app = TestApp::new();
        let response = app.post_form("/theme/toggle", "back=%2Freports").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/reports");
        assert_eq!(app.core.theme(), crate::models::ThemeMode::Dark);

        let body = body_text(app.get("/").await).await;
        assert!(body.contains("background:#121212"));
    }
}
