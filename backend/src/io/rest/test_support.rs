use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use crate::config::Config;
use crate::domain::FixedClock;
use crate::storage::DbConnection;
use crate::{create_router, AppState};

pub(crate) const ROOT_PASSWORD: &str = "admin123";

pub(crate) struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

/// Seeded app on a fresh in-memory database, clock fixed on 2025-03-05
pub(crate) async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = DbConnection::init_test().await.expect("Failed to create test database");
    build_app(db, dir).await
}

/// Same app on a database file inside the temp dir, for `VACUUM INTO` snapshots
pub(crate) async fn test_app_on_disk() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("portal.db").display());
    let db = DbConnection::new(&url).await.expect("Failed to create test database");
    build_app(db, dir).await
}

async fn build_app(db: DbConnection, dir: TempDir) -> TestApp {
    let config = Config {
        pdf_template_path: dir.path().join("fondo_constancia.pdf"),
        docx_template_path: dir.path().join("plantilla_constancia.docx"),
        backup_dir: dir.path().join("backups"),
        bootstrap_admin_password: ROOT_PASSWORD.to_string(),
        ..Config::default()
    };
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid date")));

    let state = AppState::new(db, config, clock);
    state.reference_service.seed_defaults().await.expect("seed");
    state
        .admin_service
        .ensure_bootstrap_admin(ROOT_PASSWORD)
        .await
        .expect("bootstrap admin");

    let router = create_router(state.clone()).expect("router");
    TestApp { router, state, _dir: dir }
}

pub(crate) async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.expect("request failed")
}

pub(crate) fn form_request(method: Method, uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub(crate) fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub(crate) fn delete_request(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

pub(crate) async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub(crate) async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// `name=value` pairs of every Set-Cookie header, joined for a Cookie header
pub(crate) fn cookies_from(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Log in and return the session cookie pair
pub(crate) async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let body = format!("username={}&password={}", username, password);
    let response = send(app, form_request(Method::POST, "/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login failed for {}", username);
    cookies_from(&response)
}

pub(crate) async fn login_root(app: &TestApp) -> String {
    login(app, "admin", ROOT_PASSWORD).await
}
