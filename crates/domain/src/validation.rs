//! Type-specific validation of submitted resource bodies.
//!
//! Each resource body implements [`Validatable`]; the default accepts
//! everything. The helpers here push onto an [`Errors`] collection and
//! never stop at the first failure.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::errors::{codes, Errors, ValidationError};

/// Longest free-text answer accepted in any note or statement.
pub const MAX_TEXT_LENGTH: usize = 20_000;

pub trait Validatable {
    /// Check the body in isolation. `root` is the JSON path of the resource
    /// (e.g. `$.current_period`), so shared body types report under the
    /// resource they were submitted as. An empty collection means valid.
    fn validate(&self, _root: &str) -> Errors {
        Errors::new()
    }
}

impl Validatable for serde_json::Value {}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// A mandatory text field: present and not blank.
pub fn require_text(errors: &mut Errors, value: Option<&str>, location: &str) {
    match value {
        Some(text) if !text.trim().is_empty() => check_length(errors, text, location),
        _ => errors.missing(location),
    }
}

/// An optional text field, length-checked when present.
pub fn optional_text(errors: &mut Errors, value: Option<&str>, location: &str) {
    if let Some(text) = value {
        check_length(errors, text, location);
    }
}

fn check_length(errors: &mut Errors, text: &str, location: &str) {
    if text.chars().count() > MAX_TEXT_LENGTH {
        errors.push(
            ValidationError::new(codes::INVALID_INPUT_LENGTH, location)
                .with_value("max_length", MAX_TEXT_LENGTH),
        );
    }
}

/// A mandatory ISO date. Returns the parsed date when valid.
pub fn require_date(errors: &mut Errors, value: Option<&str>, location: &str) -> Option<Date> {
    match value {
        None => {
            errors.missing(location);
            None
        }
        Some(text) => optional_date(errors, Some(text), location),
    }
}

/// An optional ISO date. Returns the parsed date when present and valid.
pub fn optional_date(errors: &mut Errors, value: Option<&str>, location: &str) -> Option<Date> {
    let text = value?;
    let parsed = parse_date(text);
    if parsed.is_none() {
        errors.add(codes::DATE_INVALID, location);
    }
    parsed
}

/// A date that may not lie in the future.
pub fn not_in_future(errors: &mut Errors, date: Option<Date>, location: &str) {
    if let Some(date) = date {
        if date > today() {
            errors.push(
                ValidationError::new(codes::DATE_OUTSIDE_RANGE, location)
                    .with_value("latest", today()),
            );
        }
    }
}

/// A monetary figure that may not be negative.
pub fn non_negative(errors: &mut Errors, value: Option<i64>, location: &str) {
    if let Some(v) = value {
        if v < 0 {
            errors.push(
                ValidationError::new(codes::VALUE_OUTSIDE_RANGE, location).with_value("lower", 0),
            );
        }
    }
}

pub fn within_range(errors: &mut Errors, value: Option<i64>, lower: i64, upper: i64, location: &str) {
    if let Some(v) = value {
        if v < lower || v > upper {
            errors.push(
                ValidationError::new(codes::VALUE_OUTSIDE_RANGE, location)
                    .with_value("lower", lower)
                    .with_value("upper", upper),
            );
        }
    }
}

/// `total` must equal the sum of the supplied components.
///
/// Absent components count as zero. An absent total is accepted when every
/// component is absent too; otherwise it is reported as missing.
pub fn check_total(errors: &mut Errors, components: &[Option<i64>], total: Option<i64>, location: &str) {
    check_net_total(errors, components, &[], total, location);
}

/// `total` must equal the sum of `added` less the sum of `subtracted`.
///
/// Arithmetic is carried out in `i128`, so no combination of `i64` figures
/// can overflow.
pub fn check_net_total(
    errors: &mut Errors,
    added: &[Option<i64>],
    subtracted: &[Option<i64>],
    total: Option<i64>,
    location: &str,
) {
    let any_component = added.iter().chain(subtracted).any(Option::is_some);
    let plus: i128 = added.iter().flatten().map(|&v| i128::from(v)).sum();
    let minus: i128 = subtracted.iter().flatten().map(|&v| i128::from(v)).sum();
    match total {
        None if any_component => errors.missing(location),
        None => {}
        Some(t) if i128::from(t) != plus - minus => errors.add(codes::INCORRECT_TOTAL, location),
        Some(_) => {}
    }
}
