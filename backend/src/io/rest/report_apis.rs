//! # REST API for Reports
//!
//! Issued certificates and the audit trail. Requires the reports permission.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{AuditListResponse, PaymentListResponse};
use tracing::info;

use crate::domain::models::admin::Permission;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::{AuditMapper, PaymentMapper};
use crate::io::rest::session::Admin;
use crate::AppState;

const DEFAULT_AUDIT_LIMIT: u32 = 100;
const MAX_AUDIT_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<u32>,
}

/// Every completed record, newest first
pub async fn list_issued_certificates(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Result<Json<PaymentListResponse>, AppError> {
    info!("GET /admin/certificates");
    admin.require(Permission::Reports)?;

    let payments = state.report_service.completed().await?;
    Ok(Json(PaymentListResponse {
        payments: PaymentMapper::to_dto_list(payments, state.certificate_service.suffix()),
    }))
}

pub async fn list_audit_entries(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditListResponse>, AppError> {
    info!("GET /admin/audit - limit: {:?}", query.limit);
    admin.require(Permission::Reports)?;

    let limit = query.limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT);
    let entries = state.audit_service.recent(limit).await?;
    Ok(Json(AuditListResponse {
        entries: entries.into_iter().map(AuditMapper::to_dto).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/certificates", get(list_issued_certificates))
        .route("/admin/audit", get(list_audit_entries))
}
