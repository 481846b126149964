//! # REST API for Backups

use axum::{extract::State, response::Response, routing::get, Router};
use tracing::info;

use crate::domain::models::admin::Permission;
use crate::domain::RenderedDocument;
use crate::io::rest::certificate_apis::document_response;
use crate::io::rest::error::AppError;
use crate::io::rest::session::Admin;
use crate::AppState;

/// Snapshot of the database as a download. Requires the configuration permission.
pub async fn download_backup(State(state): State<AppState>, Admin(admin): Admin) -> Result<Response, AppError> {
    info!("GET /admin/backup - user: {}", admin.username);
    admin.require(Permission::Configuration)?;

    let artifact = state.backup_service.create_backup(&admin.username).await?;
    let document = RenderedDocument {
        file_name: artifact.file_name,
        content_type: artifact.content_type,
        bytes: artifact.bytes,
    };
    Ok(document_response(document, true))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/backup", get(download_backup))
}
