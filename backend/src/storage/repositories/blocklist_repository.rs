use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::blocklist::{BlockedIdentifier, NewBlockedIdentifier};
use crate::storage::connection::DbConnection;

/// Repository for barred identifiers
#[derive(Clone)]
pub struct BlocklistRepository {
    db: DbConnection,
}

impl BlocklistRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// First entry whose identifier equals either the voucher or the DNI
    pub async fn find_matching(&self, voucher: &str, dni: &str) -> Result<Option<BlockedIdentifier>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, reason, name, kind, faculty, school
            FROM blocklist
            WHERE identifier = ? OR identifier = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(dni)
        .bind(voucher)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    pub async fn exists(&self, identifier: &str) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM blocklist WHERE identifier = ?")
            .bind(identifier)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    pub async fn insert(&self, entry: &NewBlockedIdentifier) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO blocklist (identifier, reason, name, kind, faculty, school)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.identifier)
        .bind(&entry.reason)
        .bind(&entry.name)
        .bind(&entry.kind)
        .bind(&entry.faculty)
        .bind(&entry.school)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<BlockedIdentifier>> {
        let row = sqlx::query(
            "SELECT id, identifier, reason, name, kind, faculty, school FROM blocklist WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    /// Newest entries first
    pub async fn list(&self) -> Result<Vec<BlockedIdentifier>> {
        let rows = sqlx::query(
            "SELECT id, identifier, reason, name, kind, faculty, school FROM blocklist ORDER BY id DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blocklist WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn entry_from_row(row: &SqliteRow) -> BlockedIdentifier {
    BlockedIdentifier {
        id: row.get("id"),
        identifier: row.get("identifier"),
        reason: row.get("reason"),
        name: row.get("name"),
        kind: row.get("kind"),
        faculty: row.get("faculty"),
        school: row.get("school"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(identifier: &str) -> NewBlockedIdentifier {
        NewBlockedIdentifier {
            identifier: identifier.to_string(),
            reason: "Deuda de biblioteca".to_string(),
            name: "PEREZ RUIZ, ANA".to_string(),
            kind: "DNI".to_string(),
            faculty: String::new(),
            school: String::new(),
        }
    }

    #[tokio::test]
    async fn test_match_on_either_identifier() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = BlocklistRepository::new(db);
        repo.insert(&entry("12345678")).await.unwrap();

        assert!(repo.find_matching("V-any", "12345678").await.unwrap().is_some());
        assert!(repo.find_matching("12345678", "00000000").await.unwrap().is_some());
        assert!(repo.find_matching("V-any", "00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identifier_is_unique() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = BlocklistRepository::new(db);
        repo.insert(&entry("V100")).await.unwrap();

        assert!(repo.exists("V100").await.unwrap());
        assert!(repo.insert(&entry("V100")).await.is_err());
    }
}
