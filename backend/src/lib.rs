//! # Certificate Portal Backend
//!
//! Students present a bank voucher, DNI and payment date; a valid and
//! sufficient payment leads to a one-time form where they enter their name
//! and program, which assigns the certificate's yearly correlative. The
//! certificate can then be downloaded as PDF or Word. Administrators manage
//! payments, the blocklist, reference lists and accounts behind a session.
//!
//! Layers:
//! - `storage`: SQLite pool and repositories
//! - `domain`: business rules, one service per module
//! - `io::rest`: axum handlers, DTO mapping and error translation

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use config::Config;
use domain::{
    AdminService, AuditService, BackupService, BlocklistService, CertificateService, CertificateSettings, Clock,
    CompletionService, IntakeService, PaymentService, ReferenceService, ReportService, SystemClock,
};
use storage::DbConnection;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub intake_service: IntakeService,
    pub completion_service: CompletionService,
    pub certificate_service: CertificateService,
    pub payment_service: PaymentService,
    pub blocklist_service: BlocklistService,
    pub reference_service: ReferenceService,
    pub admin_service: AdminService,
    pub audit_service: AuditService,
    pub report_service: ReportService,
    pub backup_service: BackupService,
}

impl AppState {
    pub fn new(db: DbConnection, config: Config, clock: Arc<dyn Clock>) -> Self {
        let min_amount = config.min_payment_amount;
        let certificate_settings = CertificateSettings {
            suffix: config.certificate_suffix.clone(),
            place: config.certificate_place.clone(),
            pdf_template: config.pdf_template_path.clone(),
            docx_template: config.docx_template_path.clone(),
        };

        Self {
            intake_service: IntakeService::new(db.clone(), min_amount),
            completion_service: CompletionService::new(db.clone(), clock.clone(), min_amount),
            certificate_service: CertificateService::new(db.clone(), clock, certificate_settings),
            payment_service: PaymentService::new(db.clone(), min_amount),
            blocklist_service: BlocklistService::new(db.clone()),
            reference_service: ReferenceService::new(db.clone()),
            admin_service: AdminService::new(db.clone(), config.session_ttl_hours),
            audit_service: AuditService::new(db.clone()),
            report_service: ReportService::new(db.clone()),
            backup_service: BackupService::new(db, config.backup_dir.clone()),
            config: Arc::new(config),
        }
    }
}

/// Open the database, seed it and build the application state
pub async fn initialize_backend(config: Config) -> Result<AppState> {
    info!("🚀 Initializing backend");

    let db = DbConnection::new(&config.database_url).await?;
    let bootstrap_password = config.bootstrap_admin_password.clone();
    let state = AppState::new(db, config, Arc::new(SystemClock));

    state.reference_service.seed_defaults().await?;
    state.admin_service.ensure_bootstrap_admin(&bootstrap_password).await?;

    info!("✅ Backend initialized");
    Ok(state)
}

/// Full router with CORS and request tracing
pub fn create_router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state.config.allowed_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(io::rest::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
