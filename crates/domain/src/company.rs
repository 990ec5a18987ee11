//! Company profile as returned by the profile lookup service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub company_number: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default)]
    pub is_community_interest_company: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<ProfileAccounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAccounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accounts: Option<LastAccounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_accounts: Option<crate::model::NextAccounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastAccounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub made_up_to: Option<String>,
}

impl CompanyProfile {
    /// A company that has filed accounts before reports comparative
    /// (previous-period) figures.
    pub fn is_multi_year_filer(&self) -> bool {
        self.accounts
            .as_ref()
            .and_then(|a| a.last_accounts.as_ref())
            .and_then(|l| l.made_up_to.as_ref())
            .is_some()
    }
}
