use shared::AuditEntry;

use crate::domain::models::audit::AuditRecord;

pub struct AuditMapper;

impl AuditMapper {
    pub fn to_dto(domain: AuditRecord) -> AuditEntry {
        AuditEntry {
            id: domain.id,
            actor: domain.actor,
            action: domain.action,
            detail: domain.detail,
            created_at: domain.created_at,
        }
    }
}
