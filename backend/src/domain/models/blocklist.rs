use serde::{Deserialize, Serialize};

/// An identifier (voucher or DNI) barred from receiving a certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockedIdentifier {
    pub id: i64,
    pub identifier: String,
    pub reason: String,
    pub name: String,
    pub kind: String,
    pub faculty: String,
    pub school: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBlockedIdentifier {
    pub identifier: String,
    pub reason: String,
    pub name: String,
    pub kind: String,
    pub faculty: String,
    pub school: String,
}
