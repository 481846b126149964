//! # REST API for Certificate Downloads

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::RenderedDocument;
use crate::io::rest::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PdfQuery {
    #[serde(default)]
    pub download: bool,
}

/// PDF certificate, shown inline unless `download=true`
pub async fn get_pdf_certificate(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Query(query): Query<PdfQuery>,
) -> Result<Response, AppError> {
    info!("GET /certificates/{}/pdf - download: {}", payment_id, query.download);

    let document = state.certificate_service.render_pdf(payment_id).await?;
    Ok(document_response(document, query.download))
}

/// Word certificate, always as an attachment
pub async fn get_docx_certificate(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<Response, AppError> {
    info!("GET /certificates/{}/docx", payment_id);

    let document = state.certificate_service.render_docx(payment_id).await?;
    Ok(document_response(document, true))
}

pub(crate) fn document_response(document: RenderedDocument, attachment: bool) -> Response {
    let disposition = if attachment { "attachment" } else { "inline" };
    let disposition = format!("{}; filename=\"{}\"", disposition, header_safe(&document.file_name));

    (
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response()
}

/// Keep file names printable ASCII without quotes
fn header_safe(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/certificates/:id/pdf", get(get_pdf_certificate))
        .route("/certificates/:id/docx", get(get_docx_certificate))
}
