use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use shared::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::PortalError;
use crate::io::rest::session::flash_cookie;

/// Error type returned by every handler
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("Solicitud mal formada: {0}")]
    MalformedPayload(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        let AppError::Portal(err) = self else {
            return StatusCode::BAD_REQUEST;
        };

        match err {
            PortalError::MissingField(_) | PortalError::InvalidAmount(_) | PortalError::ImportFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            PortalError::InvalidCredentials | PortalError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PortalError::Blocked { .. } | PortalError::Forbidden(_) => StatusCode::FORBIDDEN,
            PortalError::NotFound { .. } | PortalError::IncorrectData => StatusCode::NOT_FOUND,
            PortalError::DuplicateVoucher(_)
            | PortalError::DuplicateIdentifier(_)
            | PortalError::DuplicateName(_)
            | PortalError::DuplicateUsername(_)
            | PortalError::SelfDeletion => StatusCode::CONFLICT,
            PortalError::InsufficientAmount { .. } | PortalError::NotCompleted => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::MissingTemplate(_) | PortalError::Render(_) | PortalError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Portal(err) => err.code(),
            AppError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authorization problems send the browser somewhere useful
            AppError::Portal(PortalError::Unauthenticated) => {
                return Redirect::to("/login").into_response();
            }
            AppError::Portal(PortalError::Forbidden(permission)) => {
                warn!("Permission denied: {:?}", permission);
                let jar = CookieJar::new().add(flash_cookie(permission.denial_message()));
                return (jar, Redirect::to("/admin")).into_response();
            }
            _ => {}
        }

        let status = self.status();
        let message = if let AppError::Portal(PortalError::Storage(e)) = &self {
            error!("Storage failure: {:#}", e);
            "Error interno del servidor.".to_string()
        } else {
            if status.is_server_error() {
                error!("Request failed: {}", self);
            } else {
                warn!("Request rejected: {}", self);
            }
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
