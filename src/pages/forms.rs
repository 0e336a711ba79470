//! Form field validation
//!
//! Required-field checks and birthday normalization shared by the forms.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Date format the API expects for birthdays
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client-side validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty
    #[error("Please input your {0}!")]
    Required(&'static str),

    /// A date field could not be parsed
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// The value, or an error when it is empty or blank
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

/// `None` for an absent or blank value, the trimmed value otherwise
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a birthday given as `YYYY-MM-DD` or as a full timestamp
pub fn parse_birthday(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt.date());
        }
    }

    Err(ValidationError::InvalidDate(input.to_string()))
}

/// Normalize an optional birthday to `YYYY-MM-DD`; blank means no birthday
pub fn format_birthday(input: Option<&str>) -> Result<Option<String>, ValidationError> {
    match optional(input) {
        Some(value) => Ok(Some(parse_birthday(&value)?.format(DATE_FORMAT).to_string())),
        None => Ok(None),
    }
}

/// Birthday as shown in a form: normalized when it parses, raw otherwise
pub fn display_birthday(raw: &str) -> String {
    parse_birthday(raw)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}
