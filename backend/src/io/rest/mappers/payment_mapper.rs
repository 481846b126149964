use shared::{CompletionRequest, CreatePaymentRequest, IntakeRequest, PaymentRecord};

use crate::domain::certificate::format_correlative;
use crate::domain::commands::completion::CompleteRecordCommand;
use crate::domain::commands::intake::ValidateIntakeCommand;
use crate::domain::commands::payments::CreatePaymentCommand;
use crate::domain::models::payment::Payment;

/// Mapper between payment DTOs and domain payments
pub struct PaymentMapper;

impl PaymentMapper {
    /// `suffix` is the institutional suffix of the formatted correlative
    pub fn to_dto(domain: Payment, suffix: &str) -> PaymentRecord {
        let correlative = match (domain.correlative_number, domain.registration_year) {
            (Some(number), Some(year)) => Some(format_correlative(number, year, suffix)),
            _ => None,
        };

        PaymentRecord {
            id: domain.id,
            voucher: domain.voucher,
            dni: domain.dni,
            payment_date: domain.payment_date,
            amount: domain.amount,
            full_name: domain.full_name,
            faculty: domain.faculty,
            school: domain.school,
            degree: domain.degree,
            registered_at: domain.registered_at,
            correlative_number: domain.correlative_number,
            registration_year: domain.registration_year,
            correlative,
        }
    }

    pub fn to_dto_list(domain: Vec<Payment>, suffix: &str) -> Vec<PaymentRecord> {
        domain.into_iter().map(|payment| Self::to_dto(payment, suffix)).collect()
    }

    pub fn to_intake_command(dto: IntakeRequest) -> ValidateIntakeCommand {
        ValidateIntakeCommand {
            voucher: dto.voucher,
            dni: dto.dni,
            date: dto.date,
        }
    }

    pub fn to_completion_command(payment_id: i64, dto: CompletionRequest) -> CompleteRecordCommand {
        CompleteRecordCommand {
            payment_id,
            paternal_surname: dto.paternal_surname,
            maternal_surname: dto.maternal_surname,
            given_names: dto.given_names,
            faculty: dto.faculty,
            school: dto.school,
            degree: dto.degree,
        }
    }

    pub fn to_create_command(dto: CreatePaymentRequest) -> CreatePaymentCommand {
        CreatePaymentCommand {
            voucher: dto.voucher,
            dni: dto.dni,
            date: dto.date,
            amount: dto.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(number: Option<i64>, year: Option<i32>) -> Payment {
        Payment {
            id: 9,
            voucher: "V9".to_string(),
            dni: "1".to_string(),
            payment_date: "2025-03-05".to_string(),
            amount: 60.0,
            full_name: None,
            faculty: None,
            school: None,
            degree: None,
            registered_at: "2025-03-05T10:00:00+00:00".to_string(),
            correlative_number: number,
            registration_year: year,
        }
    }

    #[test]
    fn test_correlative_only_for_numbered_records() {
        let numbered = PaymentMapper::to_dto(payment(Some(7), Some(2025)), "UB/DBU-UNAP");
        assert_eq!(numbered.correlative.as_deref(), Some("007-2025-UB/DBU-UNAP"));

        let pending = PaymentMapper::to_dto(payment(None, None), "UB/DBU-UNAP");
        assert_eq!(pending.correlative, None);
    }
}
