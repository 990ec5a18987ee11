//! Loans to directors and related-party transactions.

use serde::{Deserialize, Serialize};

use crate::errors::Errors;
use crate::validation::{check_net_total, non_negative, optional_text, require_text, Validatable};

/// Body of the loans-to-directors note. Its content is its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoansToDirectors {}

impl Validatable for LoansToDirectors {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<LoanBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_at_period_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advances_credits_made: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advances_credits_repaid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_at_period_end: Option<i64>,
}

impl Validatable for Loan {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(
            &mut errors,
            self.director_name.as_deref(),
            &format!("{}.director_name", root),
        );
        optional_text(
            &mut errors,
            self.description.as_deref(),
            &format!("{}.description", root),
        );
        if let Some(b) = &self.breakdown {
            let path = format!("{}.breakdown", root);
            for (name, value) in [
                ("balance_at_period_start", b.balance_at_period_start),
                ("advances_credits_made", b.advances_credits_made),
                ("advances_credits_repaid", b.advances_credits_repaid),
                ("balance_at_period_end", b.balance_at_period_end),
            ] {
                non_negative(&mut errors, value, &format!("{}.{}", path, name));
            }
            check_net_total(
                &mut errors,
                &[b.balance_at_period_start, b.advances_credits_made],
                &[b.advances_credits_repaid],
                b.balance_at_period_end,
                &format!("{}.balance_at_period_end", path),
            );
        }
        errors
    }
}

/// Body of the related-party-transactions note. Its content is its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedPartyTransactions {}

impl Validatable for RelatedPartyTransactions {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedPartyTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_of_related_party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_of_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_at_period_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_at_period_end: Option<i64>,
}

impl Validatable for RelatedPartyTransaction {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(
            &mut errors,
            self.name_of_related_party.as_deref(),
            &format!("{}.name_of_related_party", root),
        );
        require_text(
            &mut errors,
            self.relationship.as_deref(),
            &format!("{}.relationship", root),
        );
        optional_text(
            &mut errors,
            self.description_of_transaction.as_deref(),
            &format!("{}.description_of_transaction", root),
        );
        errors
    }
}
