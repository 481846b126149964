use tracing::{info, warn};

use crate::domain::commands::intake::{IntakeResult, ValidateIntakeCommand};
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::models::payment::Payment;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{BlocklistRepository, PaymentRepository};

/// Public entry point: decides whether a voucher can lead to a certificate.
#[derive(Clone)]
pub struct IntakeService {
    payments: PaymentRepository,
    blocklist: BlocklistRepository,
    min_amount: f64,
}

impl IntakeService {
    pub fn new(db: DbConnection, min_amount: f64) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            blocklist: BlocklistRepository::new(db),
            min_amount,
        }
    }

    /// Blocklist, exact match, amount threshold, then routing, in that order
    pub async fn validate(&self, command: ValidateIntakeCommand) -> PortalResult<IntakeResult> {
        let voucher = required(&command.voucher, "voucher")?;
        let dni = required(&command.dni, "dni")?;
        let date = required(&command.date, "fecha")?;
        info!("🔎 Intake for voucher {} / dni {}", voucher, dni);

        ensure_not_blocked(&self.blocklist, voucher, dni).await?;

        let payment = self
            .payments
            .find_for_intake(voucher, dni, date)
            .await?
            .ok_or(PortalError::IncorrectData)?;

        ensure_threshold(&payment, self.min_amount)?;

        if payment.is_completed() {
            info!("Voucher {} already completed, routing to documents", voucher);
            Ok(IntakeResult::Completed(payment))
        } else {
            info!("Voucher {} pending completion", voucher);
            Ok(IntakeResult::PendingCompletion(payment))
        }
    }
}

pub(crate) fn required<'a>(value: &'a str, field: &'static str) -> PortalResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortalError::MissingField(field));
    }
    Ok(trimmed)
}

pub(crate) async fn ensure_not_blocked(
    blocklist: &BlocklistRepository,
    voucher: &str,
    dni: &str,
) -> PortalResult<()> {
    if let Some(entry) = blocklist.find_matching(voucher, dni).await? {
        warn!("🚫 Blocked identifier {} ({})", entry.identifier, entry.reason);
        return Err(PortalError::Blocked {
            kind: entry.kind,
            reason: entry.reason,
        });
    }
    Ok(())
}

pub(crate) fn ensure_threshold(payment: &Payment, min_amount: f64) -> PortalResult<()> {
    if !payment.meets_threshold(min_amount) {
        return Err(PortalError::InsufficientAmount {
            amount: payment.amount,
            minimum: min_amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::blocklist::NewBlockedIdentifier;
    use crate::domain::models::payment::{CompletionData, NewPayment};

    async fn setup() -> (IntakeService, PaymentRepository, BlocklistRepository) {
        let db = DbConnection::init_test().await.unwrap();
        (
            IntakeService::new(db.clone(), 57.50),
            PaymentRepository::new(db.clone()),
            BlocklistRepository::new(db),
        )
    }

    fn new_payment(voucher: &str, amount: f64) -> NewPayment {
        NewPayment {
            voucher: voucher.to_string(),
            dni: "12345678".to_string(),
            payment_date: "2025-03-05".to_string(),
            amount,
        }
    }

    fn command(voucher: &str, dni: &str, date: &str) -> ValidateIntakeCommand {
        ValidateIntakeCommand {
            voucher: voucher.to_string(),
            dni: dni.to_string(),
            date: date.to_string(),
        }
    }

    fn block(identifier: &str, kind: &str, reason: &str) -> NewBlockedIdentifier {
        NewBlockedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
            name: String::new(),
            kind: kind.to_string(),
            faculty: String::new(),
            school: String::new(),
        }
    }

    #[tokio::test]
    async fn test_pending_record_routes_to_completion() {
        let (service, payments, _) = setup().await;
        payments.insert(&new_payment("V100", 60.0)).await.unwrap();

        let result = service.validate(command(" V100 ", "12345678", "2025-03-05")).await.unwrap();
        assert!(matches!(result, IntakeResult::PendingCompletion(ref p) if p.voucher == "V100"));
    }

    #[tokio::test]
    async fn test_completed_record_routes_to_documents() {
        let (service, payments, _) = setup().await;
        let id = payments.insert(&new_payment("V100", 60.0)).await.unwrap();
        let data = CompletionData {
            full_name: "PEREZ RUIZ, ANA".to_string(),
            faculty: "FACULTAD DE DERECHO".to_string(),
            school: "DERECHO".to_string(),
            degree: "BACHILLER".to_string(),
        };
        payments.complete(id, &data, 2025).await.unwrap();

        let result = service.validate(command("V100", "12345678", "2025-03-05")).await.unwrap();
        assert!(matches!(result, IntakeResult::Completed(_)));
    }

    #[tokio::test]
    async fn test_mismatched_date_is_incorrect_data() {
        let (service, payments, _) = setup().await;
        payments.insert(&new_payment("V100", 60.0)).await.unwrap();

        let err = service.validate(command("V100", "12345678", "2025-03-06")).await.unwrap_err();
        assert!(matches!(err, PortalError::IncorrectData));
    }

    #[tokio::test]
    async fn test_blocklist_wins_over_missing_payment() {
        let (service, _, blocklist) = setup().await;
        blocklist.insert(&block("12345678", "DNI", "Deuda")).await.unwrap();

        // No payment exists, but the blocklist is checked first
        let err = service.validate(command("V999", "12345678", "2025-03-05")).await.unwrap_err();
        match err {
            PortalError::Blocked { kind, reason } => {
                assert_eq!(kind, "DNI");
                assert_eq!(reason, "Deuda");
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blocked_voucher_matches_too() {
        let (service, payments, blocklist) = setup().await;
        payments.insert(&new_payment("V100", 60.0)).await.unwrap();
        blocklist.insert(&block("V100", "VOUCHER", "Anulado")).await.unwrap();

        let err = service.validate(command("V100", "12345678", "2025-03-05")).await.unwrap_err();
        assert!(matches!(err, PortalError::Blocked { .. }));
    }

    #[tokio::test]
    async fn test_amount_below_threshold_is_rejected() {
        let (service, payments, _) = setup().await;
        payments.insert(&new_payment("V100", 57.49)).await.unwrap();

        let err = service.validate(command("V100", "12345678", "2025-03-05")).await.unwrap_err();
        assert!(matches!(err, PortalError::InsufficientAmount { .. }));
    }

    #[tokio::test]
    async fn test_empty_field_is_rejected_before_lookup() {
        let (service, _, _) = setup().await;

        let err = service.validate(command("V100", "  ", "2025-03-05")).await.unwrap_err();
        assert!(matches!(err, PortalError::MissingField("dni")));
    }
}
