//! # REST API for Payment Management
//!
//! Manual entry, bulk upload and deletion of bank payments. Every endpoint
//! requires the payments permission.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Form, Router,
};
use shared::{CreatePaymentRequest, ImportResponse, MessageResponse, PaymentListResponse, PaymentResponse};
use tracing::info;

use crate::domain::commands::payments::ImportPaymentsCommand;
use crate::domain::models::admin::Permission;
use crate::domain::PortalError;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::PaymentMapper;
use crate::io::rest::session::Admin;
use crate::AppState;

/// Most recent payments first
pub async fn list_payments(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Result<Json<PaymentListResponse>, AppError> {
    info!("GET /admin/payments");
    admin.require(Permission::Payments)?;

    let payments = state.payment_service.list_recent().await?;
    Ok(Json(PaymentListResponse {
        payments: PaymentMapper::to_dto_list(payments, state.certificate_service.suffix()),
    }))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Form(request): Form<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    info!("POST /admin/payments - voucher: {}", request.voucher.trim());
    admin.require(Permission::Payments)?;

    let payment = state
        .payment_service
        .create(&admin.username, PaymentMapper::to_create_command(request))
        .await?;

    let response = PaymentResponse {
        message: format!("Pago {} registrado.", payment.voucher),
        payment: PaymentMapper::to_dto(payment, state.certificate_service.suffix()),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Upload of a spreadsheet or CSV in the `file` field
pub async fn import_payments(
    State(state): State<AppState>,
    Admin(admin): Admin,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    info!("POST /admin/payments/import");
    admin.require(Permission::Payments)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedPayload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;
        upload = Some(ImportPaymentsCommand {
            file_name,
            content: content.to_vec(),
        });
    }

    let command = upload.ok_or_else(|| PortalError::ImportFailed("no se envió ningún archivo".to_string()))?;
    let summary = state.payment_service.import(&admin.username, command).await?;

    Ok(Json(ImportResponse {
        message: format!(
            "Carga completada: {} nuevos, {} omitidos.",
            summary.created,
            summary.skipped()
        ),
        summary,
    }))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(payment_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("DELETE /admin/payments/{}", payment_id);
    admin.require(Permission::Payments)?;

    state.payment_service.delete(&admin.username, payment_id).await?;
    Ok(Json(MessageResponse {
        message: "Pago eliminado.".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/payments", get(list_payments).post(create_payment))
        .route("/admin/payments/import", post(import_payments))
        .route("/admin/payments/:id", delete(delete_payment))
}
