//! Legal statements attached to the accounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{codes, Errors};
use crate::validation::Validatable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_agreed_to_legal_statements: Option<bool>,
    /// Statement texts keyed by statement name, rendered by the document
    /// generator.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub legal_statements: BTreeMap<String, String>,
}

impl Statements {
    pub fn agreed(&self) -> bool {
        self.has_agreed_to_legal_statements == Some(true)
    }
}

impl Validatable for Statements {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        if self.has_agreed_to_legal_statements.is_none() {
            errors.add(
                codes::MANDATORY_ELEMENT_MISSING,
                format!("{}.has_agreed_to_legal_statements", root),
            );
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_flag_must_be_present() {
        let errors = Statements::default().validate("$.statements");
        assert!(errors.contains(
            codes::MANDATORY_ELEMENT_MISSING,
            "$.statements.has_agreed_to_legal_statements"
        ));
    }

    #[test]
    fn explicit_disagreement_is_a_valid_submission() {
        let statements = Statements {
            has_agreed_to_legal_statements: Some(false),
            ..Default::default()
        };
        assert!(statements.validate("$.statements").is_empty());
        assert!(!statements.agreed());
    }
}
