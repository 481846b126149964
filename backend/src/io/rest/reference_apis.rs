//! # REST API for Reference Lists
//!
//! Faculties, schools and degrees offered in the completion form. The list
//! is chosen by the `:kind` path segment (`faculties`, `schools`, `degrees`).
//! Requires the configuration permission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Form, Router,
};
use shared::{CreateReferenceRequest, MessageResponse, ReferenceItem, ReferenceListResponse};
use tracing::info;

use crate::domain::commands::references::CreateReferenceCommand;
use crate::domain::models::admin::Permission;
use crate::domain::models::reference::ReferenceKind;
use crate::io::rest::error::AppError;
use crate::io::rest::mappers::ReferenceMapper;
use crate::io::rest::session::Admin;
use crate::AppState;

fn parse_kind(raw: &str) -> Result<ReferenceKind, AppError> {
    raw.parse().map_err(AppError::MalformedPayload)
}

pub async fn list_references(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(kind): Path<String>,
) -> Result<Json<ReferenceListResponse>, AppError> {
    info!("GET /admin/references/{}", kind);
    admin.require(Permission::Configuration)?;

    let kind = parse_kind(&kind)?;
    let items = state.reference_service.list(kind).await?;
    Ok(Json(ReferenceListResponse {
        kind: kind.to_string(),
        items: items.into_iter().map(ReferenceMapper::to_item).collect(),
    }))
}

pub async fn create_reference(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(kind): Path<String>,
    Form(request): Form<CreateReferenceRequest>,
) -> Result<(StatusCode, Json<ReferenceItem>), AppError> {
    info!("POST /admin/references/{} - name: {}", kind, request.name.trim());
    admin.require(Permission::Configuration)?;

    let command = CreateReferenceCommand {
        kind: parse_kind(&kind)?,
        name: request.name,
        faculty_id: request.faculty_id,
    };
    let entry = state.reference_service.create(&admin.username, command).await?;
    Ok((StatusCode::CREATED, Json(ReferenceMapper::to_item(entry))))
}

pub async fn delete_reference(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("DELETE /admin/references/{}/{}", kind, id);
    admin.require(Permission::Configuration)?;

    state
        .reference_service
        .delete(&admin.username, parse_kind(&kind)?, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Eliminado.".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/references/:kind", get(list_references).post(create_reference))
        .route("/admin/references/:kind/:id", delete(delete_reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::*;
    use axum::http::Method;
    use shared::ErrorResponse;

    #[tokio::test]
    async fn test_create_school_under_faculty() {
        let app = test_app().await;
        let cookie = login_root(&app).await;

        let faculties: ReferenceListResponse =
            body_json(send(&app, get_request("/admin/references/faculties", Some(&cookie))).await).await;
        let faculty_id = faculties.items[0].id;

        let body = format!("name=medicina+humana&faculty_id={}", faculty_id);
        let response = send(&app, form_request(Method::POST, "/admin/references/schools", &body, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let school: ReferenceItem = body_json(response).await;
        assert_eq!(school.name, "MEDICINA HUMANA");
        assert_eq!(school.faculty_id, Some(faculty_id));

        let uri = format!("/api/schools?faculty_id={}", faculty_id);
        let schools: Vec<shared::LookupOption> = body_json(send(&app, get_request(&uri, None)).await).await;
        assert!(schools.iter().any(|option| option.id == school.id));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let app = test_app().await;
        let cookie = login_root(&app).await;

        let response = send(&app, form_request(Method::POST, "/admin/references/degrees", "name=bachiller", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.code, "DUPLICATE_NAME");
    }

    #[tokio::test]
    async fn test_unknown_list_is_rejected() {
        let app = test_app().await;
        let cookie = login_root(&app).await;

        let response = send(&app, get_request("/admin/references/careers", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_degree() {
        let app = test_app().await;
        let cookie = login_root(&app).await;

        let body = "name=maestro";
        let degree: ReferenceItem =
            body_json(send(&app, form_request(Method::POST, "/admin/references/degrees", body, Some(&cookie))).await).await;

        let uri = format!("/admin/references/degrees/{}", degree.id);
        assert_eq!(send(&app, delete_request(&uri, &cookie)).await.status(), StatusCode::OK);
        assert_eq!(send(&app, delete_request(&uri, &cookie)).await.status(), StatusCode::NOT_FOUND);
    }
}
