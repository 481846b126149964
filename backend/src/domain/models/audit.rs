use serde::{Deserialize, Serialize};

/// Action tags written to the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    LoginSucceeded,
    LoginFailed,
    Logout,
    PaymentCreated,
    PaymentsImported,
    PaymentDeleted,
    RecordCompleted,
    IdentifierBlocked,
    IdentifierUnblocked,
    ReferenceCreated,
    ReferenceDeleted,
    AdminCreated,
    AdminUpdated,
    AdminDeleted,
    BackupCreated,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::LoginSucceeded => "LOGIN",
            AuditAction::LoginFailed => "LOGIN_FAILED",
            AuditAction::Logout => "LOGOUT",
            AuditAction::PaymentCreated => "PAYMENT_CREATED",
            AuditAction::PaymentsImported => "PAYMENTS_IMPORTED",
            AuditAction::PaymentDeleted => "PAYMENT_DELETED",
            AuditAction::RecordCompleted => "RECORD_COMPLETED",
            AuditAction::IdentifierBlocked => "IDENTIFIER_BLOCKED",
            AuditAction::IdentifierUnblocked => "IDENTIFIER_UNBLOCKED",
            AuditAction::ReferenceCreated => "REFERENCE_CREATED",
            AuditAction::ReferenceDeleted => "REFERENCE_DELETED",
            AuditAction::AdminCreated => "ADMIN_CREATED",
            AuditAction::AdminUpdated => "ADMIN_UPDATED",
            AuditAction::AdminDeleted => "ADMIN_DELETED",
            AuditAction::BackupCreated => "BACKUP_CREATED",
        }
    }
}

/// A stored audit log row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    pub id: i64,
    pub actor: String,
    pub action: String,
    pub detail: String,
    pub created_at: String,
}
