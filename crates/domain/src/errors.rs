//! Structured validation errors.
//!
//! Errors are accumulated rather than returned on first failure so that a
//! client sees every defect of a submission in one response. Each error
//! points at the offending element with a JSON path.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const LOCATION_TYPE_JSON_PATH: &str = "json-path";
pub const ERROR_TYPE_VALIDATION: &str = "ch:validation";

/// Error identifiers returned to clients.
pub mod codes {
    pub const MANDATORY_ELEMENT_MISSING: &str = "mandatory_element_missing";
    pub const INVALID_VALUE: &str = "invalid_value";
    pub const INCORRECT_TOTAL: &str = "incorrect_total";
    pub const DATE_INVALID: &str = "date_invalid";
    pub const DATE_OUTSIDE_RANGE: &str = "date_outside_range";
    pub const VALUE_OUTSIDE_RANGE: &str = "value_outside_range";
    pub const INVALID_INPUT_LENGTH: &str = "invalid_input_length";
    pub const INVALID_JSON: &str = "invalid_json";
    pub const VALUE_NOT_EQUAL_TO_BALANCE_SHEET: &str = "value_not_equal_to_balance_sheet";
}

/// A single defect in a submitted resource or in the resource graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error: String,
    pub location: String,
    pub location_type: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub error_values: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new(error: &str, location: impl Into<String>) -> Self {
        ValidationError {
            error: error.to_string(),
            location: location.into(),
            location_type: LOCATION_TYPE_JSON_PATH.to_string(),
            error_type: ERROR_TYPE_VALIDATION.to_string(),
            error_values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: &str, value: impl ToString) -> Self {
        self.error_values.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.error, self.location)
    }
}

/// An ordered collection of validation errors. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Errors(Vec<ValidationError>);

impl Errors {
    pub fn new() -> Self {
        Errors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Shorthand for pushing an error with no values.
    pub fn add(&mut self, code: &str, location: impl Into<String>) {
        self.push(ValidationError::new(code, location));
    }

    pub fn missing(&mut self, location: impl Into<String>) {
        self.add(codes::MANDATORY_ELEMENT_MISSING, location);
    }

    pub fn extend(&mut self, other: Errors) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether an error with `code` was recorded at `location`.
    pub fn contains(&self, code: &str, location: &str) -> bool {
        self.0
            .iter()
            .any(|e| e.error == code && e.location == location)
    }

    pub fn at(&self, location: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.location == location).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl IntoIterator for Errors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ValidationError> for Errors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Errors(iter.into_iter().collect())
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let err = ValidationError::new(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.approval");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["error"], "mandatory_element_missing");
        assert_eq!(value["location"], "$.small_full.approval");
        assert_eq!(value["location_type"], "json-path");
        assert_eq!(value["type"], "ch:validation");
        assert!(value.get("error_values").is_none());
    }

    #[test]
    fn error_values_are_kept() {
        let err = ValidationError::new(codes::VALUE_OUTSIDE_RANGE, "$.employees.current_period")
            .with_value("lower", 0)
            .with_value("upper", 99999);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["error_values"]["upper"], "99999");
    }

    #[test]
    fn extend_concatenates_in_order() {
        let mut a = Errors::new();
        a.missing("$.a");
        let mut b = Errors::new();
        b.missing("$.b");
        a.extend(b);
        let locations: Vec<&str> = a.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["$.a", "$.b"]);
        assert!(a.contains(codes::MANDATORY_ELEMENT_MISSING, "$.b"));
    }
}
