use tracing::info;

use crate::domain::audit_service::AuditService;
use crate::domain::commands::references::CreateReferenceCommand;
use crate::domain::completion_service::normalize;
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::models::audit::AuditAction;
use crate::domain::models::reference::{ReferenceEntry, ReferenceKind};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::ReferenceRepository;

/// Faculties, schools and degrees offered in the forms
#[derive(Clone)]
pub struct ReferenceService {
    repository: ReferenceRepository,
    audit: AuditService,
}

impl ReferenceService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: ReferenceRepository::new(db.clone()),
            audit: AuditService::new(db),
        }
    }

    /// Insert the default rows into every empty table
    pub async fn seed_defaults(&self) -> PortalResult<()> {
        for kind in ReferenceKind::all() {
            if self.repository.count(kind).await? > 0 {
                continue;
            }
            for name in kind.defaults() {
                self.repository.insert(kind, name, None).await?;
            }
            info!("Seeded {} default {}", kind.defaults().len(), kind);
        }
        Ok(())
    }

    pub async fn list(&self, kind: ReferenceKind) -> PortalResult<Vec<ReferenceEntry>> {
        Ok(self.repository.list(kind).await?)
    }

    /// Schools of one faculty, or every school when no faculty is given
    pub async fn schools(&self, faculty_id: Option<i64>) -> PortalResult<Vec<ReferenceEntry>> {
        let schools = match faculty_id {
            Some(id) => self.repository.list_schools_for_faculty(id).await?,
            None => self.repository.list(ReferenceKind::School).await?,
        };
        Ok(schools)
    }

    pub async fn create(&self, actor: &str, command: CreateReferenceCommand) -> PortalResult<ReferenceEntry> {
        let name = normalize(&command.name);
        if name.is_empty() {
            return Err(PortalError::MissingField("nombre"));
        }
        if self.repository.exists(command.kind, &name).await? {
            return Err(PortalError::DuplicateName(name));
        }

        let faculty_id = match (command.kind, command.faculty_id) {
            (ReferenceKind::School, Some(faculty_id)) => {
                if self
                    .repository
                    .find_by_id(ReferenceKind::Faculty, faculty_id)
                    .await?
                    .is_none()
                {
                    return Err(PortalError::not_found("Facultad", faculty_id));
                }
                Some(faculty_id)
            }
            _ => None,
        };

        let id = self.repository.insert(command.kind, &name, faculty_id).await?;
        self.audit
            .record(actor, AuditAction::ReferenceCreated, format!("{}: {}", command.kind, name))
            .await;

        Ok(ReferenceEntry { id, name, faculty_id })
    }

    pub async fn delete(&self, actor: &str, kind: ReferenceKind, id: i64) -> PortalResult<()> {
        let entry = self
            .repository
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| PortalError::not_found("Elemento", id))?;

        self.repository.delete(kind, id).await?;
        self.audit
            .record(actor, AuditAction::ReferenceDeleted, format!("{}: {}", kind, entry.name))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> ReferenceService {
        ReferenceService::new(DbConnection::init_test().await.unwrap())
    }

    fn create(kind: ReferenceKind, name: &str, faculty_id: Option<i64>) -> CreateReferenceCommand {
        CreateReferenceCommand {
            kind,
            name: name.to_string(),
            faculty_id,
        }
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_tables() {
        let service = service().await;
        service
            .create("admin", create(ReferenceKind::Degree, "diplomado", None))
            .await
            .unwrap();

        service.seed_defaults().await.unwrap();
        service.seed_defaults().await.unwrap();

        let faculties = service.list(ReferenceKind::Faculty).await.unwrap();
        assert_eq!(faculties.len(), ReferenceKind::Faculty.defaults().len());
        let degrees = service.list(ReferenceKind::Degree).await.unwrap();
        assert_eq!(degrees.len(), 1);
    }

    #[tokio::test]
    async fn test_create_uppercases_and_rejects_duplicates() {
        let service = service().await;

        let entry = service
            .create("admin", create(ReferenceKind::Faculty, " facultad de  derecho", None))
            .await
            .unwrap();
        assert_eq!(entry.name, "FACULTAD DE DERECHO");

        assert!(matches!(
            service
                .create("admin", create(ReferenceKind::Faculty, "Facultad de Derecho", None))
                .await,
            Err(PortalError::DuplicateName(_))
        ));
        assert!(matches!(
            service.create("admin", create(ReferenceKind::Faculty, "  ", None)).await,
            Err(PortalError::MissingField(_))
        ));
    }

    #[tokio::test]
    async fn test_schools_filtered_by_faculty() {
        let service = service().await;
        let law = service
            .create("admin", create(ReferenceKind::Faculty, "derecho", None))
            .await
            .unwrap();
        service
            .create("admin", create(ReferenceKind::School, "derecho", Some(law.id)))
            .await
            .unwrap();
        service
            .create("admin", create(ReferenceKind::School, "enfermería", None))
            .await
            .unwrap();

        let of_law = service.schools(Some(law.id)).await.unwrap();
        assert_eq!(of_law.len(), 1);
        assert_eq!(of_law[0].faculty_id, Some(law.id));
        assert_eq!(service.schools(None).await.unwrap().len(), 2);

        assert!(matches!(
            service
                .create("admin", create(ReferenceKind::School, "medicina", Some(999)))
                .await,
            Err(PortalError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let service = service().await;
        let entry = service
            .create("admin", create(ReferenceKind::Degree, "bachiller", None))
            .await
            .unwrap();

        service.delete("admin", ReferenceKind::Degree, entry.id).await.unwrap();
        assert!(service.list(ReferenceKind::Degree).await.unwrap().is_empty());
    }
}
