//! The filing envelope handed to the transaction service on close.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SMALL_FULL_FILING_KIND: &str = "accounts#smallfull";
pub const ACCOUNTS_RELATIONSHIP: &str = "accounts";

/// Account types a filing can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    SmallFull,
}

impl AccountType {
    /// Identifier the document generator expects.
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::SmallFull => "small-full",
        }
    }

    pub fn filing_kind(self) -> &'static str {
        match self {
            AccountType::SmallFull => SMALL_FULL_FILING_KIND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    pub company_number: String,
    pub description_identifier: String,
    pub kind: String,
    pub description_values: BTreeMap<String, String>,
    pub description: String,
    pub data: FilingData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingData {
    pub period_end_on: String,
    pub links: Vec<FilingLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingLink {
    pub relationship: String,
    pub href: String,
}

impl FilingLink {
    pub fn accounts(href: impl Into<String>) -> Self {
        FilingLink {
            relationship: ACCOUNTS_RELATIONSHIP.to_string(),
            href: href.into(),
        }
    }
}
