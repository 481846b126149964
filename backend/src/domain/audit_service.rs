use tracing::{info, warn};

use crate::domain::errors::PortalResult;
use crate::domain::models::audit::{AuditAction, AuditRecord};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::AuditRepository;

/// Records who did what. A failed audit write never fails the operation
/// being audited, it is only logged.
#[derive(Clone)]
pub struct AuditService {
    repository: AuditRepository,
}

impl AuditService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: AuditRepository::new(db),
        }
    }

    pub async fn record(&self, actor: &str, action: AuditAction, detail: impl AsRef<str>) {
        let detail = detail.as_ref();
        match self.repository.append(actor, action.as_str(), detail).await {
            Ok(_) => info!("📝 audit {} by {}: {}", action.as_str(), actor, detail),
            Err(e) => warn!("Failed to write audit entry {} by {}: {}", action.as_str(), actor, e),
        }
    }

    pub async fn recent(&self, limit: u32) -> PortalResult<Vec<AuditRecord>> {
        Ok(self.repository.list_recent(limit).await?)
    }
}
