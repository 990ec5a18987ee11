//! Approvals and the directors' report family.

use serde::{Deserialize, Serialize};

use crate::errors::{codes, Errors};
use crate::validation::{not_in_future, optional_date, optional_text, require_date, require_text, Validatable};

/// Sign-off by a director. Used for the accounts, the directors' report and
/// the CIC report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Validatable for Approval {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(&mut errors, self.name.as_deref(), &format!("{}.name", root));
        let location = format!("{}.date", root);
        let date = require_date(&mut errors, self.date.as_deref(), &location);
        not_in_future(&mut errors, date, &location);
        errors
    }
}

/// Body of the directors' report. Its content is its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorsReport {}

impl Validatable for DirectorsReport {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Director {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resignation_date: Option<String>,
}

impl Validatable for Director {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(&mut errors, self.name.as_deref(), &format!("{}.name", root));
        let appointed = optional_date(
            &mut errors,
            self.appointment_date.as_deref(),
            &format!("{}.appointment_date", root),
        );
        let resigned = optional_date(
            &mut errors,
            self.resignation_date.as_deref(),
            &format!("{}.resignation_date", root),
        );
        if let (Some(appointed), Some(resigned)) = (appointed, resigned) {
            if appointed > resigned {
                errors.add(codes::DATE_OUTSIDE_RANGE, format!("{}.resignation_date", root));
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secretary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Validatable for Secretary {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(&mut errors, self.name.as_deref(), &format!("{}.name", root));
        errors
    }
}

/// Free-text sections of the directors' report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorsReportStatements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_policy_on_disabled_employees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub political_and_charitable_donations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_activities: Option<String>,
}

impl Validatable for DirectorsReportStatements {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        for (name, value) in [
            ("additional_information", &self.additional_information),
            (
                "company_policy_on_disabled_employees",
                &self.company_policy_on_disabled_employees,
            ),
            (
                "political_and_charitable_donations",
                &self.political_and_charitable_donations,
            ),
            ("principal_activities", &self.principal_activities),
        ] {
            optional_text(&mut errors, value.as_deref(), &format!("{}.{}", root, name));
        }
        errors
    }
}
