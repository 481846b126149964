//! # Storage Module
//!
//! SQLite persistence for the portal. `DbConnection` owns the pool and the
//! schema; each repository wraps one table (or one family of tables) and is
//! handed to the services that need it at startup.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    AdminRepository, AuditRepository, BlocklistRepository, PaymentRepository,
    ReferenceRepository, ReportRepository, SessionRepository,
};
