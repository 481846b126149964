//! Domain-level command and result types.
//! Services take these instead of the public DTOs from the `shared` crate;
//! the REST layer maps between the two.

pub mod intake {
    use crate::domain::models::payment::Payment;

    /// Voucher, DNI and date typed by a student at the public screen.
    #[derive(Debug, Clone)]
    pub struct ValidateIntakeCommand {
        pub voucher: String,
        pub dni: String,
        pub date: String,
    }

    /// Where a valid intake leads.
    #[derive(Debug, Clone, PartialEq)]
    pub enum IntakeResult {
        /// The payment still needs the student's identity data
        PendingCompletion(Payment),
        /// The certificate is ready to be downloaded
        Completed(Payment),
    }

    impl IntakeResult {
        pub fn payment(&self) -> &Payment {
            match self {
                IntakeResult::PendingCompletion(payment) | IntakeResult::Completed(payment) => payment,
            }
        }
    }
}

pub mod completion {
    use crate::domain::models::payment::Payment;
    use crate::domain::models::reference::ReferenceEntry;

    /// Identity and program data entered once per payment.
    #[derive(Debug, Clone)]
    pub struct CompleteRecordCommand {
        pub payment_id: i64,
        pub paternal_surname: String,
        pub maternal_surname: String,
        pub given_names: String,
        pub faculty: String,
        pub school: String,
        pub degree: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct CompletionResult {
        pub payment: Payment,
        /// True when an earlier request had already completed the record
        pub already_completed: bool,
    }

    /// What the completion screen needs to render.
    #[derive(Debug, Clone, PartialEq)]
    pub enum CompletionForm {
        AlreadyCompleted(Payment),
        Pending {
            payment: Payment,
            faculties: Vec<ReferenceEntry>,
            schools: Vec<ReferenceEntry>,
            degrees: Vec<ReferenceEntry>,
        },
    }
}

pub mod payments {
    /// Manual entry from the admin panel, amount still unparsed.
    #[derive(Debug, Clone)]
    pub struct CreatePaymentCommand {
        pub voucher: String,
        pub dni: String,
        pub date: String,
        pub amount: String,
    }

    /// An uploaded spreadsheet or delimited text file.
    #[derive(Debug, Clone)]
    pub struct ImportPaymentsCommand {
        pub file_name: String,
        pub content: Vec<u8>,
    }
}

pub mod blocklist {
    #[derive(Debug, Clone, Default)]
    pub struct BlockIdentifierCommand {
        pub identifier: String,
        pub name: String,
        pub kind: String,
        pub faculty: String,
        pub school: String,
        pub reason: String,
    }
}

pub mod references {
    use crate::domain::models::reference::ReferenceKind;

    #[derive(Debug, Clone)]
    pub struct CreateReferenceCommand {
        pub kind: ReferenceKind,
        pub name: String,
        pub faculty_id: Option<i64>,
    }
}

pub mod admin {
    use crate::domain::models::admin::PermissionSet;

    /// Create or edit an admin account. On edit an empty password keeps
    /// the stored hash.
    #[derive(Debug, Clone)]
    pub struct SaveAdminCommand {
        pub username: String,
        pub password: String,
        pub permissions: PermissionSet,
    }
}
