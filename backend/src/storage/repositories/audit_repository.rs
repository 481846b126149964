use anyhow::Result;
use chrono::Utc;
use sqlx::Row;

use crate::domain::models::audit::AuditRecord;
use crate::storage::connection::DbConnection;

/// Append-only audit log, exposes no update or delete
#[derive(Clone)]
pub struct AuditRepository {
    db: DbConnection,
}

impl AuditRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn append(&self, actor: &str, action: &str, detail: &str) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_log (actor, action, detail, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(actor)
        .bind(action)
        .bind(detail)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Newest entries first
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, actor, action, detail, created_at
            FROM audit_log
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        let records = rows
            .iter()
            .map(|row| AuditRecord {
                id: row.get("id"),
                actor: row.get("actor"),
                action: row.get("action"),
                detail: row.get("detail"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(records)
    }
}
