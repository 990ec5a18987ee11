//! Company-account root and the small-full container.

use serde::{Deserialize, Serialize};

use crate::errors::{codes, Errors};
use crate::validation::{optional_date, require_date, Validatable};

/// The accounting period the filing covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextAccounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end_on: Option<String>,
}

/// Body of the company-account root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_accounts: Option<NextAccounts>,
}

impl Validatable for CompanyAccount {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        let base = format!("{}.next_accounts", root);
        let Some(next) = &self.next_accounts else {
            errors.missing(base);
            return errors;
        };
        let end = require_date(
            &mut errors,
            next.period_end_on.as_deref(),
            &format!("{}.period_end_on", base),
        );
        let start = optional_date(
            &mut errors,
            next.period_start_on.as_deref(),
            &format!("{}.period_start_on", base),
        );
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                errors.add(codes::DATE_OUTSIDE_RANGE, format!("{}.period_start_on", base));
            }
        }
        errors
    }
}

/// Body of the small-full container. Its content is its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmallFull {}

impl Validatable for SmallFull {}
