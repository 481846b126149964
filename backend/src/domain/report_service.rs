use shared::{CountEntry, DashboardStats, RepeatedHolder};

use crate::domain::errors::PortalResult;
use crate::domain::models::payment::Payment;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{PaymentRepository, ReportRepository};

/// Read-only figures for the dashboard and the reports screen
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    payments: PaymentRepository,
}

impl ReportService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            reports: ReportRepository::new(db.clone()),
            payments: PaymentRepository::new(db),
        }
    }

    pub async fn dashboard(&self) -> PortalResult<DashboardStats> {
        let total_vouchers = self.reports.count_payments().await?;
        let issued = self.reports.count_completed().await?;

        Ok(DashboardStats {
            total_vouchers,
            issued,
            pending: total_vouchers - issued,
            blocked: self.reports.count_blocked().await?,
            by_faculty: to_entries(self.reports.completed_by_faculty().await?),
            top_schools: to_entries(self.reports.top_schools().await?),
            by_degree: to_entries(self.reports.completed_by_degree().await?),
            repeated: self
                .reports
                .repeated_holders()
                .await?
                .into_iter()
                .map(|(dni, full_name, count)| RepeatedHolder { dni, full_name, count })
                .collect(),
        })
    }

    /// Issued certificates, newest first
    pub async fn completed(&self) -> PortalResult<Vec<Payment>> {
        Ok(self.payments.list_completed().await?)
    }
}

fn to_entries(rows: Vec<(String, i64)>) -> Vec<CountEntry> {
    rows.into_iter()
        .map(|(label, count)| CountEntry { label, count })
        .collect()
}
