//! # Domain Module
//!
//! Business rules of the certificate portal: intake validation, the one-time
//! completion that allocates the yearly correlative, certificate rendering and
//! the administrative modules around them. Services receive their repositories
//! at construction time and never reach for global state.

pub mod admin_service;
pub mod audit_service;
pub mod auth;
pub mod backup_service;
pub mod blocklist_service;
pub mod certificate;
pub mod clock;
pub mod commands;
pub mod completion_service;
pub mod errors;
pub mod intake_service;
pub mod models;
pub mod password;
pub mod payment_import;
pub mod payment_service;
pub mod reference_service;
pub mod report_service;

pub use admin_service::*;
pub use audit_service::*;
pub use auth::*;
pub use backup_service::*;
pub use blocklist_service::*;
pub use certificate::{CertificateData, CertificateService, CertificateSettings, RenderedDocument};
pub use clock::*;
pub use completion_service::*;
pub use errors::*;
pub use intake_service::*;
pub use payment_service::*;
pub use reference_service::*;
pub use report_service::*;
