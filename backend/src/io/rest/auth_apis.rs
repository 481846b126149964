//! # REST API for Admin Sessions
//!
//! Login, logout and the dashboard that every permission denial lands on.

use axum::{
    extract::State,
    response::{IntoResponse, Json, Redirect},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{DashboardResponse, LoginRequest, MessageResponse};
use tracing::info;

use crate::io::rest::error::AppError;
use crate::io::rest::mappers::AdminMapper;
use crate::io::rest::session::{expired_session_cookie, session_cookie, take_flash, Admin, SESSION_COOKIE};
use crate::AppState;

pub async fn login_page() -> Json<MessageResponse> {
    info!("GET /login");
    Json(MessageResponse {
        message: "Ingrese usuario y contraseña.".to_string(),
    })
}

/// Open a session and send the browser to the dashboard
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("POST /login - username: {}", request.username.trim());

    let (token, context) = state
        .admin_service
        .login(&request.username, &request.password)
        .await?;
    info!("🔑 '{}' logged in", context.username);

    let cookie = session_cookie(token, state.config.secure_cookies, state.config.session_ttl_hours);
    Ok((jar.add(cookie), Redirect::to("/admin")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse, AppError> {
    info!("GET /logout");

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.admin_service.logout(cookie.value()).await?;
    }
    Ok((jar.remove(expired_session_cookie()), Redirect::to("/login")))
}

/// Counters and rankings, plus any message left by a redirect
pub async fn dashboard(
    State(state): State<AppState>,
    Admin(admin): Admin,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    info!("GET /admin - user: {}", admin.username);

    let stats = state.report_service.dashboard().await?;
    let (jar, flash) = take_flash(jar);

    let response = DashboardResponse {
        username: admin.username,
        permissions: AdminMapper::to_permissions_dto(admin.permissions),
        stats,
        flash,
    };
    Ok((jar, Json(response)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/admin", get(dashboard))
}
