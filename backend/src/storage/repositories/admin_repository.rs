use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::admin::{AdminAccount, PermissionSet};
use crate::storage::connection::DbConnection;

const ADMIN_COLUMNS: &str =
    "id, username, password_hash, p_payments, p_blocklist, p_reports, p_configuration, p_users";

/// Repository for administrator accounts
#[derive(Clone)]
pub struct AdminRepository {
    db: DbConnection,
}

impl AdminRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE username = ?", ADMIN_COLUMNS))
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdminAccount>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE id = ?", ADMIN_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    pub async fn list(&self) -> Result<Vec<AdminAccount>> {
        let rows = sqlx::query(&format!("SELECT {} FROM admins ORDER BY id", ADMIN_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(admin_from_row).collect())
    }

    pub async fn insert(&self, username: &str, password_hash: &str, permissions: PermissionSet) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO admins (username, password_hash, p_payments, p_blocklist, p_reports, p_configuration, p_users)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(permissions.payments)
        .bind(permissions.blocklist)
        .bind(permissions.reports)
        .bind(permissions.configuration)
        .bind(permissions.users)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrite username, hash and every permission flag
    pub async fn update(&self, account: &AdminAccount) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET username = ?, password_hash = ?, p_payments = ?, p_blocklist = ?,
                p_reports = ?, p_configuration = ?, p_users = ?
            WHERE id = ?
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.permissions.payments)
        .bind(account.permissions.blocklist)
        .bind(account.permissions.reports)
        .bind(account.permissions.configuration)
        .bind(account.permissions.users)
        .bind(account.id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn admin_from_row(row: &SqliteRow) -> AdminAccount {
    AdminAccount {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        permissions: PermissionSet {
            payments: row.get("p_payments"),
            blocklist: row.get("p_blocklist"),
            reports: row.get("p_reports"),
            configuration: row.get("p_configuration"),
            users: row.get("p_users"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_update_and_reload_flags() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = AdminRepository::new(db);

        let id = repo
            .insert("clerk", "hash", PermissionSet { payments: true, ..Default::default() })
            .await
            .unwrap();

        let mut account = repo.find_by_username("clerk").await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert!(account.permissions.payments);
        assert!(!account.permissions.users);

        account.permissions.reports = true;
        account.username = "cashier".to_string();
        assert!(repo.update(&account).await.unwrap());

        let reloaded = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.username, "cashier");
        assert!(reloaded.permissions.reports);
        assert!(repo.find_by_username("clerk").await.unwrap().is_none());
    }
}
