// Repository modules
pub mod admin_repository;
pub mod audit_repository;
pub mod blocklist_repository;
pub mod payment_repository;
pub mod reference_repository;
pub mod report_repository;
pub mod session_repository;

// Re-export repository types
pub use admin_repository::AdminRepository;
pub use audit_repository::AuditRepository;
pub use blocklist_repository::BlocklistRepository;
pub use payment_repository::{BatchInsertOutcome, PaymentRepository};
pub use reference_repository::ReferenceRepository;
pub use report_repository::ReportRepository;
pub use session_repository::SessionRepository;
