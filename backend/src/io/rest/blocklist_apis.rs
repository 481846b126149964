//! # REST API for the Blocklist
//!
//! DNIs and vouchers that may not obtain a certificate. Requires the
//! blocklist permission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Form, Router,
};
use shared::{BlocklistEntry, BlocklistResponse, CreateBlocklistEntryRequest, MessageResponse};
use tracing::info;

use crate::domain::models::admin::Permission;
use crate::domain::models::reference::ReferenceKind;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::{BlocklistMapper, ReferenceMapper};
use crate::io::rest::session::Admin;
use crate::AppState;

/// Entries plus the faculty and school options of the entry form
pub async fn list_blocklist(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Result<Json<BlocklistResponse>, AppError> {
    info!("GET /admin/blocklist");
    admin.require(Permission::Blocklist)?;

    let entries = state.blocklist_service.list().await?;
    let faculties = state.reference_service.list(ReferenceKind::Faculty).await?;
    let schools = state.reference_service.list(ReferenceKind::School).await?;

    Ok(Json(BlocklistResponse {
        entries: entries.into_iter().map(BlocklistMapper::to_dto).collect(),
        faculties: ReferenceMapper::to_options(faculties),
        schools: ReferenceMapper::to_options(schools),
    }))
}

pub async fn block_identifier(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Form(request): Form<CreateBlocklistEntryRequest>,
) -> Result<(StatusCode, Json<BlocklistEntry>), AppError> {
    info!("POST /admin/blocklist - identifier: {}", request.identifier.trim());
    admin.require(Permission::Blocklist)?;

    let entry = state
        .blocklist_service
        .block(&admin.username, BlocklistMapper::to_command(request))
        .await?;
    Ok((StatusCode::CREATED, Json(BlocklistMapper::to_dto(entry))))
}

pub async fn unblock_identifier(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(entry_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("DELETE /admin/blocklist/{}", entry_id);
    admin.require(Permission::Blocklist)?;

    state.blocklist_service.unblock(&admin.username, entry_id).await?;
    Ok(Json(MessageResponse {
        message: "Desbloqueado.".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/blocklist", get(list_blocklist).post(block_identifier))
        .route("/admin/blocklist/:id", delete(unblock_identifier))
}
