use anyhow::Result;
use chrono::Utc;

use crate::storage::connection::DbConnection;

/// Repository for admin login sessions. A session only maps a token to an
/// account; permissions are always read from the account itself.
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, token: &str, admin_id: i64, expires_at: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_sessions (token, admin_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(token)
        .bind(admin_id)
        .bind(Utc::now().to_rfc3339())
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Account id behind a token that has not expired at `now` (unix seconds)
    pub async fn find_admin_id(&self, token: &str, now: i64) -> Result<Option<i64>> {
        let admin_id: Option<i64> =
            sqlx::query_scalar("SELECT admin_id FROM admin_sessions WHERE token = ? AND expires_at > ?")
                .bind(token)
                .bind(now)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(admin_id)
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE token = ?")
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Remove expired sessions, returning how many were dropped
    pub async fn purge_expired(&self, now: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
