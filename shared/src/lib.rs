use serde::{Deserialize, Serialize};

/// Form submitted by a student at the public intake screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub voucher: String,
    pub dni: String,
    /// Payment date exactly as printed on the voucher
    pub date: String,
}

/// Where a successful intake sends the student next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeOutcome {
    /// Payment validated, identity data still missing
    PendingCompletion,
    /// Data already completed, the certificate can be downloaded
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub outcome: IntakeOutcome,
    pub payment: PaymentRecord,
    /// Set when the student still has to complete their data
    pub completion_url: Option<String>,
    pub message: String,
}

/// A payment record as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub voucher: String,
    pub dni: String,
    pub payment_date: String,
    pub amount: f64,
    pub full_name: Option<String>,
    pub faculty: Option<String>,
    pub school: Option<String>,
    pub degree: Option<String>,
    /// RFC 3339 timestamp of when the record was created
    pub registered_at: String,
    pub correlative_number: Option<i64>,
    pub registration_year: Option<i32>,
    /// Formatted certificate number, e.g. "007-2025-UB/DBU-UNAP"
    pub correlative: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentRecord>,
}

/// Identity and program data entered once by the student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: String,
    pub given_names: String,
    pub faculty: String,
    pub school: String,
    pub degree: String,
}

/// Options needed to render the completion form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionFormResponse {
    pub payment: PaymentRecord,
    pub faculties: Vec<LookupOption>,
    pub schools: Vec<LookupOption>,
    pub degrees: Vec<LookupOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub payment: PaymentRecord,
    /// True when the record had been completed before this request
    pub already_completed: bool,
    pub message: String,
}

/// Small id/name pair used to populate form selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: i64,
    pub name: String,
}

/// Manual payment entry from the admin panel. The amount arrives as text
/// so that malformed numbers can be reported instead of rejected by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub voucher: String,
    pub dni: String,
    pub date: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment: PaymentRecord,
    pub message: String,
}

/// Outcome of a bulk payment upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub created: usize,
    pub skipped_malformed: usize,
    pub skipped_invalid_amount: usize,
    pub skipped_duplicate: usize,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_malformed + self.skipped_invalid_amount + self.skipped_duplicate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub summary: ImportSummary,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocklistEntry {
    pub id: i64,
    pub identifier: String,
    pub reason: String,
    pub name: String,
    pub kind: String,
    pub faculty: String,
    pub school: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBlocklistEntryRequest {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocklistResponse {
    pub entries: Vec<BlocklistEntry>,
    pub faculties: Vec<LookupOption>,
    pub schools: Vec<LookupOption>,
}

/// Row of one of the reference tables (faculties, schools, degrees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    pub name: String,
    /// Only meaningful for schools
    pub faculty_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReferenceRequest {
    pub name: String,
    #[serde(default)]
    pub faculty_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceListResponse {
    pub kind: String,
    pub items: Vec<ReferenceItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub payments: bool,
    pub blocklist: bool,
    pub reports: bool,
    pub configuration: bool,
    pub users: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: i64,
    pub username: String,
    pub permissions: Permissions,
}

/// Create/edit form for administrator accounts. Permission fields follow
/// checkbox semantics: a flag is granted when the field is present at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminAccountForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub p_payments: Option<String>,
    pub p_blocklist: Option<String>,
    pub p_reports: Option<String>,
    pub p_configuration: Option<String>,
    pub p_users: Option<String>,
}

impl AdminAccountForm {
    pub fn permissions(&self) -> Permissions {
        Permissions {
            payments: self.p_payments.is_some(),
            blocklist: self.p_blocklist.is_some(),
            reports: self.p_reports.is_some(),
            configuration: self.p_configuration.is_some(),
            users: self.p_users.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminListResponse {
    pub admins: Vec<AdminAccount>,
    pub current_user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: i64,
}

/// A DNI+name pair that holds more than one completed certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedHolder {
    pub dni: String,
    pub full_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_vouchers: i64,
    pub issued: i64,
    pub pending: i64,
    pub blocked: i64,
    pub by_faculty: Vec<CountEntry>,
    pub top_schools: Vec<CountEntry>,
    pub by_degree: Vec<CountEntry>,
    pub repeated: Vec<RepeatedHolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub username: String,
    pub permissions: Permissions,
    pub stats: DashboardStats,
    /// One-shot message left by a redirect (e.g. a permission denial)
    pub flash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub actor: String,
    pub action: String,
    pub detail: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub entries: Vec<AuditEntry>,
}

/// Generic acknowledgement carrying the user-facing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
