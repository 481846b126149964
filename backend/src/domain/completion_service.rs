use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::audit_service::AuditService;
use crate::domain::clock::Clock;
use crate::domain::commands::completion::{CompleteRecordCommand, CompletionForm, CompletionResult};
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::intake_service::{ensure_not_blocked, ensure_threshold, required};
use crate::domain::models::audit::AuditAction;
use crate::domain::models::payment::{CompletionData, Payment};
use crate::domain::models::reference::ReferenceKind;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{BlocklistRepository, PaymentRepository, ReferenceRepository};

/// One-time capture of the student's identity data. Completing a record
/// allocates the next correlative of the current year; a record is never
/// completed or numbered twice.
#[derive(Clone)]
pub struct CompletionService {
    payments: PaymentRepository,
    blocklist: BlocklistRepository,
    references: ReferenceRepository,
    audit: AuditService,
    clock: Arc<dyn Clock>,
    min_amount: f64,
}

impl CompletionService {
    pub fn new(db: DbConnection, clock: Arc<dyn Clock>, min_amount: f64) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            blocklist: BlocklistRepository::new(db.clone()),
            references: ReferenceRepository::new(db.clone()),
            audit: AuditService::new(db),
            clock,
            min_amount,
        }
    }

    /// The completed record, or the options needed to fill the form
    pub async fn form(&self, payment_id: i64) -> PortalResult<CompletionForm> {
        let payment = self.load(payment_id).await?;
        if payment.is_completed() {
            return Ok(CompletionForm::AlreadyCompleted(payment));
        }

        Ok(CompletionForm::Pending {
            payment,
            faculties: self.references.list(ReferenceKind::Faculty).await?,
            schools: self.references.list(ReferenceKind::School).await?,
            degrees: self.references.list_by_id(ReferenceKind::Degree).await?,
        })
    }

    pub async fn complete(&self, command: CompleteRecordCommand) -> PortalResult<CompletionResult> {
        info!("Completing payment {}", command.payment_id);

        let payment = self.load(command.payment_id).await?;
        if payment.is_completed() {
            info!("Payment {} was already completed, returning it unchanged", payment.id);
            return Ok(CompletionResult {
                payment,
                already_completed: true,
            });
        }

        let data = completion_data(&command)?;
        ensure_threshold(&payment, self.min_amount)?;
        ensure_not_blocked(&self.blocklist, &payment.voucher, &payment.dni).await?;

        let year = self.clock.current_year();
        let updated = self.payments.complete(payment.id, &data, year).await?;
        let payment = self.load(command.payment_id).await?;

        if !updated {
            // Another request completed it between the read and the update
            warn!("Payment {} completed concurrently", payment.id);
            return Ok(CompletionResult {
                payment,
                already_completed: true,
            });
        }

        let number = payment.correlative_number.unwrap_or_default();
        info!("✅ Payment {} completed with correlative {} of {}", payment.id, number, year);
        self.audit
            .record(
                &format!("alumno:{}", payment.dni),
                AuditAction::RecordCompleted,
                format!("voucher {} correlativo {:03}-{}", payment.voucher, number, year),
            )
            .await;

        Ok(CompletionResult {
            payment,
            already_completed: false,
        })
    }

    async fn load(&self, payment_id: i64) -> PortalResult<Payment> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Registro", payment_id))
    }
}

fn completion_data(command: &CompleteRecordCommand) -> PortalResult<CompletionData> {
    let paternal = required(&command.paternal_surname, "apellido paterno")?;
    let given = required(&command.given_names, "nombres")?;
    let faculty = required(&command.faculty, "facultad")?;
    let school = required(&command.school, "escuela")?;
    let degree = required(&command.degree, "grado")?;

    Ok(CompletionData {
        full_name: compose_full_name(paternal, &command.maternal_surname, given),
        faculty: normalize(faculty),
        school: normalize(school),
        degree: normalize(degree),
    })
}

/// "PATERNO MATERNO, NOMBRES", leaving out an empty maternal surname
pub fn compose_full_name(paternal: &str, maternal: &str, given_names: &str) -> String {
    let surnames: Vec<String> = [paternal, maternal]
        .iter()
        .map(|part| normalize(part))
        .filter(|part| !part.is_empty())
        .collect();

    format!("{}, {}", surnames.join(" "), normalize(given_names))
}

/// Upper-case and collapse whitespace
pub fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}
