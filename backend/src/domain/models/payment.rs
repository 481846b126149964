use serde::{Deserialize, Serialize};

/// A payment voucher and, once the student completes it, their certificate data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub voucher: String,
    pub dni: String,
    pub payment_date: String,
    pub amount: f64,
    pub full_name: Option<String>,
    pub faculty: Option<String>,
    pub school: Option<String>,
    pub degree: Option<String>,
    pub registered_at: String,
    pub correlative_number: Option<i64>,
    pub registration_year: Option<i32>,
}

impl Payment {
    /// A record is completed once the student has entered their name
    pub fn is_completed(&self) -> bool {
        self.full_name.as_deref().is_some_and(|name| !name.is_empty())
    }

    pub fn meets_threshold(&self, minimum: f64) -> bool {
        self.amount >= minimum
    }
}

/// Data needed to insert a payment, either typed by an admin or imported
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub voucher: String,
    pub dni: String,
    pub payment_date: String,
    pub amount: f64,
}

/// Normalized identity/program data written by a completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionData {
    pub full_name: String,
    pub faculty: String,
    pub school: String,
    pub degree: String,
}
