//! Community interest company report.

use serde::{Deserialize, Serialize};

use crate::errors::Errors;
use crate::validation::{require_text, Validatable};

/// Body of the CIC report. Its content is its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CicReport {}

impl Validatable for CicReport {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CicStatements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_activities_and_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_with_stakeholders: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors_remuneration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_of_assets: Option<String>,
}

impl Validatable for CicStatements {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        let base = format!("{}.reporting_period", root);
        let period = self.reporting_period.clone().unwrap_or_default();
        for (name, value) in [
            (
                "company_activities_and_impact",
                &period.company_activities_and_impact,
            ),
            (
                "consultation_with_stakeholders",
                &period.consultation_with_stakeholders,
            ),
            ("directors_remuneration", &period.directors_remuneration),
            ("transfer_of_assets", &period.transfer_of_assets),
        ] {
            require_text(&mut errors, value.as_deref(), &format!("{}.{}", base, name));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;

    #[test]
    fn every_reporting_period_text_is_required() {
        let statements = CicStatements {
            reporting_period: Some(ReportingPeriod {
                company_activities_and_impact: Some("We help".into()),
                ..Default::default()
            }),
        };
        let errors = statements.validate("$.cic_statements");
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(
            codes::MANDATORY_ELEMENT_MISSING,
            "$.cic_statements.reporting_period.transfer_of_assets"
        ));
    }
}
