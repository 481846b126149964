//! # REST API for Administrator Accounts
//!
//! Requires the users permission. Permission changes apply from the next
//! request of the edited account, since sessions resolve permissions from
//! storage every time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Form, Router,
};
use shared::{AdminAccount, AdminAccountForm, AdminListResponse, MessageResponse};
use tracing::info;

use crate::domain::models::admin::Permission;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::AdminMapper;
use crate::io::rest::session::Admin;
use crate::AppState;

pub async fn list_admins(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Result<Json<AdminListResponse>, AppError> {
    info!("GET /admin/users");
    admin.require(Permission::Users)?;

    let admins = state.admin_service.list().await?;
    Ok(Json(AdminListResponse {
        admins: admins.into_iter().map(AdminMapper::to_dto).collect(),
        current_user: admin.username,
    }))
}

pub async fn create_admin(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Form(form): Form<AdminAccountForm>,
) -> Result<(StatusCode, Json<AdminAccount>), AppError> {
    info!("POST /admin/users - username: {}", form.username.trim());
    admin.require(Permission::Users)?;

    let account = state
        .admin_service
        .create(&admin, AdminMapper::to_save_command(form))
        .await?;
    Ok((StatusCode::CREATED, Json(AdminMapper::to_dto(account))))
}

/// An empty password keeps the current one
pub async fn update_admin(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(account_id): Path<i64>,
    Form(form): Form<AdminAccountForm>,
) -> Result<Json<AdminAccount>, AppError> {
    info!("POST /admin/users/{} - username: {}", account_id, form.username.trim());
    admin.require(Permission::Users)?;

    let account = state
        .admin_service
        .update(&admin, account_id, AdminMapper::to_save_command(form))
        .await?;
    Ok(Json(AdminMapper::to_dto(account)))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(account_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("DELETE /admin/users/{}", account_id);
    admin.require(Permission::Users)?;

    state.admin_service.delete(&admin, account_id).await?;
    Ok(Json(MessageResponse {
        message: "Usuario eliminado.".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_admins).post(create_admin))
        .route("/admin/users/:id", post(update_admin).delete(delete_admin))
}
