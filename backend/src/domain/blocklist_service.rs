use tracing::info;

use crate::domain::audit_service::AuditService;
use crate::domain::commands::blocklist::BlockIdentifierCommand;
use crate::domain::completion_service::normalize;
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::intake_service::required;
use crate::domain::models::audit::AuditAction;
use crate::domain::models::blocklist::{BlockedIdentifier, NewBlockedIdentifier};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::BlocklistRepository;

#[derive(Clone)]
pub struct BlocklistService {
    repository: BlocklistRepository,
    audit: AuditService,
}

impl BlocklistService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: BlocklistRepository::new(db.clone()),
            audit: AuditService::new(db),
        }
    }

    pub async fn list(&self) -> PortalResult<Vec<BlockedIdentifier>> {
        Ok(self.repository.list().await?)
    }

    pub async fn block(&self, actor: &str, command: BlockIdentifierCommand) -> PortalResult<BlockedIdentifier> {
        let identifier = required(&command.identifier, "identificador")?;
        if self.repository.exists(identifier).await? {
            return Err(PortalError::DuplicateIdentifier(identifier.to_string()));
        }

        let entry = NewBlockedIdentifier {
            identifier: identifier.to_string(),
            reason: command.reason.trim().to_string(),
            name: normalize(&command.name),
            kind: normalize(&command.kind),
            faculty: normalize(&command.faculty),
            school: normalize(&command.school),
        };
        let id = self.repository.insert(&entry).await?;
        info!("🚫 Blocked {} ({})", entry.identifier, entry.reason);

        self.audit
            .record(
                actor,
                AuditAction::IdentifierBlocked,
                format!("{} {}: {}", entry.kind, entry.identifier, entry.reason),
            )
            .await;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Bloqueo", id))
    }

    pub async fn unblock(&self, actor: &str, id: i64) -> PortalResult<()> {
        let entry = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Bloqueo", id))?;

        self.repository.delete(id).await?;
        self.audit
            .record(actor, AuditAction::IdentifierUnblocked, &entry.identifier)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(identifier: &str) -> BlockIdentifierCommand {
        BlockIdentifierCommand {
            identifier: identifier.to_string(),
            name: "ana pérez".to_string(),
            kind: "dni".to_string(),
            reason: "Deuda de biblioteca".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_block_normalizes_and_rejects_duplicates() {
        let db = DbConnection::init_test().await.unwrap();
        let service = BlocklistService::new(db);

        let entry = service.block("admin", command(" 12345678 ")).await.unwrap();
        assert_eq!(entry.identifier, "12345678");
        assert_eq!(entry.name, "ANA PÉREZ");
        assert_eq!(entry.kind, "DNI");
        assert_eq!(entry.reason, "Deuda de biblioteca");

        assert!(matches!(
            service.block("admin", command("12345678")).await,
            Err(PortalError::DuplicateIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_unblock_removes_entry() {
        let db = DbConnection::init_test().await.unwrap();
        let service = BlocklistService::new(db);
        let first = service.block("admin", command("1")).await.unwrap();
        service.block("admin", command("2")).await.unwrap();

        service.unblock("admin", first.id).await.unwrap();

        let remaining = service.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].identifier, "2");
        assert!(matches!(
            service.unblock("admin", first.id).await,
            Err(PortalError::NotFound { .. })
        ));
    }
}
