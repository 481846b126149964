use anyhow::Result;
use sqlx::Row;

use crate::storage::connection::DbConnection;

/// (label, count) pair produced by the grouping queries
pub type LabelCount = (String, i64);

/// Read-only aggregate queries behind the admin dashboard
#[derive(Clone)]
pub struct ReportRepository {
    db: DbConnection,
}

impl ReportRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn count_payments(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    pub async fn count_completed(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE full_name IS NOT NULL AND full_name <> ''")
                .fetch_one(self.db.pool())
                .await?;
        Ok(count)
    }

    pub async fn count_blocked(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blocklist")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    pub async fn completed_by_faculty(&self) -> Result<Vec<LabelCount>> {
        self.grouped(
            r#"
            SELECT faculty AS label, COUNT(id) AS total
            FROM payments
            WHERE faculty IS NOT NULL
            GROUP BY faculty
            ORDER BY faculty
            "#,
        )
        .await
    }

    /// The ten schools with the most completed records
    pub async fn top_schools(&self) -> Result<Vec<LabelCount>> {
        self.grouped(
            r#"
            SELECT school AS label, COUNT(id) AS total
            FROM payments
            WHERE school IS NOT NULL
            GROUP BY school
            ORDER BY total DESC, school
            LIMIT 10
            "#,
        )
        .await
    }

    pub async fn completed_by_degree(&self) -> Result<Vec<LabelCount>> {
        self.grouped(
            r#"
            SELECT degree AS label, COUNT(id) AS total
            FROM payments
            WHERE degree IS NOT NULL
            GROUP BY degree
            ORDER BY degree
            "#,
        )
        .await
    }

    /// DNI + name pairs holding more than one completed record (top ten)
    pub async fn repeated_holders(&self) -> Result<Vec<(String, String, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT dni, full_name, COUNT(id) AS total
            FROM payments
            WHERE full_name IS NOT NULL AND full_name <> ''
            GROUP BY dni, full_name
            HAVING COUNT(id) > 1
            ORDER BY total DESC, dni
            LIMIT 10
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("dni"), row.get("full_name"), row.get("total")))
            .collect())
    }

    async fn grouped(&self, sql: &str) -> Result<Vec<LabelCount>> {
        let rows = sqlx::query(sql).fetch_all(self.db.pool()).await?;
        Ok(rows.iter().map(|row| (row.get("label"), row.get("total"))).collect())
    }
}
