//! The transaction a filing is assembled under. Owned by an external
//! service; this crate only reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Open,
    Closed,
    ClosedPendingPayment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub company_number: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, TransactionResource>,
}

impl Transaction {
    /// Resources may only be mutated while the transaction is open.
    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Open
    }
}

/// An entry registered on the transaction by a resource owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResource {
    pub kind: String,
    pub links: BTreeMap<String, String>,
}
