use std::io::{Cursor, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Local;
use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::audit_service::AuditService;
use crate::domain::errors::PortalResult;
use crate::domain::models::audit::AuditAction;
use crate::domain::models::reference::ReferenceKind;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{BlocklistRepository, PaymentRepository, ReferenceRepository};

/// A backup file ready to be downloaded
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Database snapshots. `VACUUM INTO` is tried first; when it fails the core
/// tables are exported as CSV files inside a zip archive instead.
#[derive(Clone)]
pub struct BackupService {
    db: DbConnection,
    payments: PaymentRepository,
    blocklist: BlocklistRepository,
    references: ReferenceRepository,
    audit: AuditService,
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(db: DbConnection, backup_dir: PathBuf) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            blocklist: BlocklistRepository::new(db.clone()),
            references: ReferenceRepository::new(db.clone()),
            audit: AuditService::new(db.clone()),
            db,
            backup_dir,
        }
    }

    pub async fn create_backup(&self, actor: &str) -> PortalResult<BackupArtifact> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

        let artifact = match self.snapshot(&stamp).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Database snapshot failed, falling back to CSV export: {}", e);
                BackupArtifact {
                    file_name: format!("respaldo_{}.zip", stamp),
                    content_type: "application/zip",
                    bytes: self.export_archive().await?,
                }
            }
        };

        info!("💾 Backup {} ({} bytes)", artifact.file_name, artifact.bytes.len());
        self.audit
            .record(actor, AuditAction::BackupCreated, &artifact.file_name)
            .await;
        Ok(artifact)
    }

    async fn snapshot(&self, stamp: &str) -> Result<BackupArtifact> {
        tokio::fs::create_dir_all(&self.backup_dir).await?;
        let file_name = format!("constancias_{}.db", stamp);
        let path = self.backup_dir.join(&file_name);
        if tokio::fs::try_exists(&path).await? {
            tokio::fs::remove_file(&path).await?;
        }

        let target = path
            .to_str()
            .ok_or_else(|| anyhow!("Backup path is not valid UTF-8: {}", path.display()))?;
        sqlx::query(&format!("VACUUM INTO '{}'", target.replace('\'', "''")))
            .execute(self.db.pool())
            .await?;

        Ok(BackupArtifact {
            file_name,
            content_type: "application/vnd.sqlite3",
            bytes: tokio::fs::read(&path).await?,
        })
    }

    /// Zip of CSV exports: payments, blocklist and the three reference lists
    pub async fn export_archive(&self) -> PortalResult<Vec<u8>> {
        let mut tables: Vec<(String, Vec<u8>)> = Vec::new();

        let mut payments = csv::Writer::from_writer(Vec::new());
        payments.write_record([
            "id",
            "voucher",
            "dni",
            "payment_date",
            "amount",
            "full_name",
            "faculty",
            "school",
            "degree",
            "registered_at",
            "correlative_number",
            "registration_year",
        ])
        .map_err(anyhow::Error::from)?;
        for payment in self.payments.list_all().await? {
            payments
                .write_record([
                    payment.id.to_string(),
                    payment.voucher,
                    payment.dni,
                    payment.payment_date,
                    payment.amount.to_string(),
                    payment.full_name.unwrap_or_default(),
                    payment.faculty.unwrap_or_default(),
                    payment.school.unwrap_or_default(),
                    payment.degree.unwrap_or_default(),
                    payment.registered_at,
                    payment.correlative_number.map(|n| n.to_string()).unwrap_or_default(),
                    payment.registration_year.map(|y| y.to_string()).unwrap_or_default(),
                ])
                .map_err(anyhow::Error::from)?;
        }
        tables.push(("payments.csv".to_string(), finish_csv(payments)?));

        let mut blocklist = csv::Writer::from_writer(Vec::new());
        blocklist
            .write_record(["id", "identifier", "reason", "name", "kind", "faculty", "school"])
            .map_err(anyhow::Error::from)?;
        for entry in self.blocklist.list().await? {
            blocklist
                .write_record([
                    entry.id.to_string(),
                    entry.identifier,
                    entry.reason,
                    entry.name,
                    entry.kind,
                    entry.faculty,
                    entry.school,
                ])
                .map_err(anyhow::Error::from)?;
        }
        tables.push(("blocklist.csv".to_string(), finish_csv(blocklist)?));

        for kind in ReferenceKind::all() {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer
                .write_record(["id", "name", "faculty_id"])
                .map_err(anyhow::Error::from)?;
            for entry in self.references.list_by_id(kind).await? {
                writer
                    .write_record([
                        entry.id.to_string(),
                        entry.name,
                        entry.faculty_id.map(|id| id.to_string()).unwrap_or_default(),
                    ])
                    .map_err(anyhow::Error::from)?;
            }
            tables.push((format!("{}.csv", kind), finish_csv(writer)?));
        }

        Ok(zip_files(tables)?)
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| anyhow!("Failed to flush CSV export: {}", e))
}

fn zip_files(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in files {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}
