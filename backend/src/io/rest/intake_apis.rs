//! # REST API for the Student Flow
//!
//! Public endpoints: voucher intake, the one-time completion form and the
//! school lookup used by that form.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use shared::{
    CompletionFormResponse, CompletionRequest, CompletionResponse, IntakeOutcome, IntakeRequest, IntakeResponse,
    LookupOption,
};
use tracing::info;

use crate::domain::commands::completion::CompletionForm;
use crate::domain::commands::intake::IntakeResult;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::{PaymentMapper, ReferenceMapper};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SchoolsQuery {
    pub faculty_id: Option<i64>,
}

/// Validate voucher, DNI and date and tell the student where to go next
pub async fn submit_intake(
    State(state): State<AppState>,
    Form(request): Form<IntakeRequest>,
) -> Result<Json<IntakeResponse>, AppError> {
    info!("POST / - voucher: {}", request.voucher.trim());

    let result = state
        .intake_service
        .validate(PaymentMapper::to_intake_command(request))
        .await?;
    let suffix = state.certificate_service.suffix();

    let response = match result {
        IntakeResult::PendingCompletion(payment) => IntakeResponse {
            outcome: IntakeOutcome::PendingCompletion,
            completion_url: Some(format!("/complete/{}", payment.id)),
            payment: PaymentMapper::to_dto(payment, suffix),
            message: "Pago validado. Complete sus datos para generar la constancia.".to_string(),
        },
        IntakeResult::Completed(payment) => IntakeResponse {
            outcome: IntakeOutcome::Completed,
            completion_url: None,
            payment: PaymentMapper::to_dto(payment, suffix),
            message: "Sus datos ya fueron registrados. Puede descargar su constancia.".to_string(),
        },
    };

    Ok(Json(response))
}

/// The completion form options, or the record itself once completed
pub async fn get_completion_form(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<Response, AppError> {
    info!("GET /complete/{}", payment_id);

    let suffix = state.certificate_service.suffix();
    let response = match state.completion_service.form(payment_id).await? {
        CompletionForm::AlreadyCompleted(payment) => Json(CompletionResponse {
            payment: PaymentMapper::to_dto(payment, suffix),
            already_completed: true,
            message: "Sus datos ya fueron registrados.".to_string(),
        })
        .into_response(),
        CompletionForm::Pending {
            payment,
            faculties,
            schools,
            degrees,
        } => Json(CompletionFormResponse {
            payment: PaymentMapper::to_dto(payment, suffix),
            faculties: ReferenceMapper::to_options(faculties),
            schools: ReferenceMapper::to_options(schools),
            degrees: ReferenceMapper::to_options(degrees),
        })
        .into_response(),
    };

    Ok(response)
}

/// Store the student's data and assign the correlative
pub async fn submit_completion(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Form(request): Form<CompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    info!("POST /complete/{}", payment_id);

    let result = state
        .completion_service
        .complete(PaymentMapper::to_completion_command(payment_id, request))
        .await?;

    let message = if result.already_completed {
        "Sus datos ya fueron registrados anteriormente."
    } else {
        "Datos registrados. Ya puede descargar su constancia."
    };

    Ok(Json(CompletionResponse {
        payment: PaymentMapper::to_dto(result.payment, state.certificate_service.suffix()),
        already_completed: result.already_completed,
        message: message.to_string(),
    }))
}

/// Schools, optionally only those of one faculty
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<SchoolsQuery>,
) -> Result<Json<Vec<LookupOption>>, AppError> {
    info!("GET /api/schools - faculty_id: {:?}", query.faculty_id);

    let schools = state.reference_service.schools(query.faculty_id).await?;
    Ok(Json(ReferenceMapper::to_options(schools)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_intake))
        .route("/complete/:id", get(get_completion_form).post(submit_completion))
        .route("/api/schools", get(list_schools))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::blocklist::BlockIdentifierCommand;
    use crate::domain::commands::payments::CreatePaymentCommand;
    use crate::io::rest::test_support::*;
    use axum::http::{Method, StatusCode};
    use shared::ErrorResponse;

    async fn seed_payment(app: &TestApp, voucher: &str, amount: &str) -> i64 {
        app.state
            .payment_service
            .create(
                "admin",
                CreatePaymentCommand {
                    voucher: voucher.to_string(),
                    dni: "44556677".to_string(),
                    date: "2025-03-01".to_string(),
                    amount: amount.to_string(),
                },
            )
            .await
            .expect("seed payment")
            .id
    }

    const COMPLETION_BODY: &str = "paternal_surname=quispe&maternal_surname=rojas&given_names=ana+maria\
        &faculty=FACULTAD+DE+INGENIERIA&school=INGENIERIA+DE+SISTEMAS&degree=BACHILLER";

    #[tokio::test]
    async fn test_intake_routes_pending_payment_to_completion() {
        let app = test_app().await;
        let id = seed_payment(&app, "V100", "60").await;

        let body = "voucher=V100&dni=44556677&date=2025-03-01";
        let response = send(&app, form_request(Method::POST, "/", body, None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let intake: IntakeResponse = body_json(response).await;
        assert_eq!(intake.outcome, IntakeOutcome::PendingCompletion);
        assert_eq!(intake.completion_url, Some(format!("/complete/{}", id)));
    }

    #[tokio::test]
    async fn test_intake_rejects_wrong_date() {
        let app = test_app().await;
        seed_payment(&app, "V101", "60").await;

        let body = "voucher=V101&dni=44556677&date=2025-03-02";
        let response = send(&app, form_request(Method::POST, "/", body, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Datos incorrectos.");
    }

    #[tokio::test]
    async fn test_intake_reports_blocked_dni() {
        let app = test_app().await;
        seed_payment(&app, "V102", "60").await;
        app.state
            .blocklist_service
            .block(
                "admin",
                BlockIdentifierCommand {
                    identifier: "44556677".to_string(),
                    reason: "deuda".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let body = "voucher=V102&dni=44556677&date=2025-03-01";
        let response = send(&app, form_request(Method::POST, "/", body, None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let error: ErrorResponse = body_json(response).await;
        assert!(error.error.starts_with("ACCESO DENEGADO"));
    }

    #[tokio::test]
    async fn test_completion_assigns_correlative_once() {
        let app = test_app().await;
        let id = seed_payment(&app, "V103", "60").await;
        let uri = format!("/complete/{}", id);

        let response = send(&app, form_request(Method::POST, &uri, COMPLETION_BODY, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let first: CompletionResponse = body_json(response).await;
        assert!(!first.already_completed);
        assert_eq!(first.payment.full_name.as_deref(), Some("QUISPE ROJAS, ANA MARIA"));
        assert_eq!(first.payment.correlative.as_deref(), Some("001-2025-UB/DBU-UNAP"));

        let again = "paternal_surname=otro&given_names=nombre&faculty=F&school=S&degree=TITULO";
        let response = send(&app, form_request(Method::POST, &uri, again, None)).await;
        let second: CompletionResponse = body_json(response).await;
        assert!(second.already_completed);
        assert_eq!(second.payment, first.payment);

        // Intake now routes straight to the documents
        let body = "voucher=V103&dni=44556677&date=2025-03-01";
        let intake: IntakeResponse = body_json(send(&app, form_request(Method::POST, "/", body, None)).await).await;
        assert_eq!(intake.outcome, IntakeOutcome::Completed);
        assert_eq!(intake.completion_url, None);
    }

    #[tokio::test]
    async fn test_completion_form_lists_options() {
        let app = test_app().await;
        let id = seed_payment(&app, "V104", "60").await;

        let response = send(&app, get_request(&format!("/complete/{}", id), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let form_response: CompletionFormResponse = body_json(response).await;
        assert_eq!(form_response.payment.id, id);
        assert!(!form_response.faculties.is_empty());
        assert!(!form_response.degrees.is_empty());
    }

    #[tokio::test]
    async fn test_completion_form_for_unknown_record() {
        let app = test_app().await;
        let response = send(&app, get_request("/complete/999", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_school_lookup_without_filter_returns_all() {
        let app = test_app().await;
        let response = send(&app, get_request("/api/schools", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let schools: Vec<LookupOption> = body_json(response).await;
        assert!(!schools.is_empty());
    }
}
