//! # REST API Interface Layer
//!
//! HTTP endpoints of the portal. Handlers translate form/JSON input into
//! domain commands, call one service and map the outcome back to the DTOs of
//! the `shared` crate. Domain errors become JSON `{error, code}` bodies,
//! except authentication and permission failures, which redirect.
//!
//! Public routes: intake, completion, certificate downloads and the school
//! lookup. Everything under `/admin` requires a session.

pub mod admin_user_apis;
pub mod auth_apis;
pub mod backup_apis;
pub mod blocklist_apis;
pub mod certificate_apis;
pub mod error;
pub mod intake_apis;
pub mod mappers;
pub mod payment_apis;
pub mod reference_apis;
pub mod report_apis;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;

use crate::AppState;

/// Every route of the application, without middleware
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(intake_apis::router())
        .merge(certificate_apis::router())
        .merge(auth_apis::router())
        .merge(payment_apis::router())
        .merge(blocklist_apis::router())
        .merge(reference_apis::router())
        .merge(admin_user_apis::router())
        .merge(report_apis::router())
        .merge(backup_apis::router())
}
