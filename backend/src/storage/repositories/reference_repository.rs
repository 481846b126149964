use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::reference::{ReferenceEntry, ReferenceKind};
use crate::storage::connection::DbConnection;

/// Repository for the faculty, school and degree lookup tables.
/// Table names come from `ReferenceKind::table`, never from user input.
#[derive(Clone)]
pub struct ReferenceRepository {
    db: DbConnection,
}

impl ReferenceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Entries ordered by name
    pub async fn list(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>> {
        let rows = sqlx::query(&format!("{} ORDER BY name", select_sql(kind)))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    /// Entries in insertion order
    pub async fn list_by_id(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>> {
        let rows = sqlx::query(&format!("{} ORDER BY id", select_sql(kind)))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    /// Schools attached to one faculty, ordered by name
    pub async fn list_schools_for_faculty(&self, faculty_id: i64) -> Result<Vec<ReferenceEntry>> {
        let rows = sqlx::query("SELECT id, name, faculty_id FROM schools WHERE faculty_id = ? ORDER BY name")
            .bind(faculty_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    pub async fn find_by_id(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceEntry>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", select_sql(kind)))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    pub async fn exists(&self, kind: ReferenceKind, name: &str) -> Result<bool> {
        let row = sqlx::query(&format!("SELECT id FROM {} WHERE name = ?", kind.table()))
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    pub async fn insert(&self, kind: ReferenceKind, name: &str, faculty_id: Option<i64>) -> Result<i64> {
        let result = match kind {
            ReferenceKind::School => {
                sqlx::query("INSERT INTO schools (name, faculty_id) VALUES (?, ?)")
                    .bind(name)
                    .bind(faculty_id)
                    .execute(self.db.pool())
                    .await?
            }
            _ => {
                sqlx::query(&format!("INSERT INTO {} (name) VALUES (?)", kind.table()))
                    .bind(name)
                    .execute(self.db.pool())
                    .await?
            }
        };

        Ok(result.last_insert_rowid())
    }

    pub async fn delete(&self, kind: ReferenceKind, id: i64) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self, kind: ReferenceKind) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table()))
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

fn select_sql(kind: ReferenceKind) -> String {
    match kind {
        ReferenceKind::School => "SELECT id, name, faculty_id FROM schools".to_string(),
        other => format!("SELECT id, name, NULL AS faculty_id FROM {}", other.table()),
    }
}

fn entry_from_row(row: &SqliteRow) -> ReferenceEntry {
    ReferenceEntry {
        id: row.get("id"),
        name: row.get("name"),
        faculty_id: row.get("faculty_id"),
    }
}
