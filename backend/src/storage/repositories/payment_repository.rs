use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

use crate::domain::models::payment::{CompletionData, NewPayment, Payment};
use crate::storage::connection::DbConnection;

const PAYMENT_COLUMNS: &str = "id, voucher, dni, payment_date, amount, full_name, faculty, school, \
     degree, registered_at, correlative_number, registration_year";

/// Attempts made when the (year, correlative) unique index rejects an allocation
const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Result of a bulk insert that skips vouchers already stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInsertOutcome {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Repository for payment records
#[derive(Clone)]
pub struct PaymentRepository {
    db: DbConnection,
}

impl PaymentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new payment and return its id
    pub async fn insert(&self, payment: &NewPayment) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (voucher, dni, payment_date, amount, registered_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.voucher)
        .bind(&payment.dni)
        .bind(&payment.payment_date)
        .bind(payment.amount)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert every payment whose voucher is not stored yet, in one transaction.
    /// Vouchers repeated inside the batch count as duplicates after their first row.
    pub async fn insert_batch_skipping_existing(&self, payments: &[NewPayment]) -> Result<BatchInsertOutcome> {
        let mut tx = self.db.pool().begin().await?;
        let mut outcome = BatchInsertOutcome::default();
        let registered_at = Utc::now().to_rfc3339();

        for payment in payments {
            let existing = sqlx::query("SELECT id FROM payments WHERE voucher = ? LIMIT 1")
                .bind(&payment.voucher)
                .fetch_optional(&mut *tx)
                .await?;

            if existing.is_some() {
                outcome.duplicates += 1;
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO payments (voucher, dni, payment_date, amount, registered_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&payment.voucher)
            .bind(&payment.dni)
            .bind(&payment.payment_date)
            .bind(payment.amount)
            .bind(&registered_at)
            .execute(&mut *tx)
            .await?;
            outcome.inserted += 1;
        }

        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(payment_from_row))
    }

    pub async fn voucher_exists(&self, voucher: &str) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM payments WHERE voucher = ? LIMIT 1")
            .bind(voucher)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Exact voucher + DNI + date match used by the public intake
    pub async fn find_for_intake(&self, voucher: &str, dni: &str, payment_date: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE voucher = ? AND dni = ? AND payment_date = ? ORDER BY id LIMIT 1",
            PAYMENT_COLUMNS
        ))
        .bind(voucher)
        .bind(dni)
        .bind(payment_date)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(payment_from_row))
    }

    /// Most recent payments first
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM payments ORDER BY id DESC LIMIT ?",
            PAYMENT_COLUMNS
        ))
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(payment_from_row).collect())
    }

    /// Completed records (certificates issued), newest first
    pub async fn list_completed(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE full_name IS NOT NULL AND full_name <> '' ORDER BY id DESC",
            PAYMENT_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(payment_from_row).collect())
    }

    /// Every payment in insertion order, used by exports
    pub async fn list_all(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!("SELECT {} FROM payments ORDER BY id", PAYMENT_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(payment_from_row).collect())
    }

    /// Returns true if a row was deleted
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Write the completion data and allocate the next correlative of `year`.
    ///
    /// The maximum is read and the new number written by the same UPDATE, so
    /// SQLite's single writer serializes concurrent completions. Only records
    /// without a name are touched; returns false when nothing was updated
    /// (already completed or unknown id).
    pub async fn complete(&self, id: i64, data: &CompletionData, year: i32) -> Result<bool> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = sqlx::query(
                r#"
                UPDATE payments
                SET full_name = ?,
                    faculty = ?,
                    school = ?,
                    degree = ?,
                    registration_year = ?,
                    correlative_number = (
                        SELECT COALESCE(MAX(correlative_number), 0) + 1
                        FROM payments
                        WHERE registration_year = ?
                    )
                WHERE id = ? AND (full_name IS NULL OR full_name = '')
                "#,
            )
            .bind(&data.full_name)
            .bind(&data.faculty)
            .bind(&data.school)
            .bind(&data.degree)
            .bind(year)
            .bind(year)
            .bind(id)
            .execute(self.db.pool())
            .await;

            match result {
                Ok(done) => return Ok(done.rows_affected() > 0),
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() && attempt < MAX_ALLOCATION_ATTEMPTS => {
                    warn!("Correlative conflict for payment {} in {}, retrying (attempt {})", id, year, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Highest correlative assigned in `year`, if any
    pub async fn max_correlative(&self, year: i32) -> Result<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(correlative_number) FROM payments WHERE registration_year = ?",
        )
        .bind(year)
        .fetch_one(self.db.pool())
        .await?;

        Ok(max)
    }
}

fn payment_from_row(row: &SqliteRow) -> Payment {
    Payment {
        id: row.get("id"),
        voucher: row.get("voucher"),
        dni: row.get("dni"),
        payment_date: row.get("payment_date"),
        amount: row.get("amount"),
        full_name: row.get("full_name"),
        faculty: row.get("faculty"),
        school: row.get("school"),
        degree: row.get("degree"),
        registered_at: row.get("registered_at"),
        correlative_number: row.get("correlative_number"),
        registration_year: row.get("registration_year"),
    }
}
