//! Request schemas for every write body and list query.
//!
//! Serde fixes the shape (required fields, types, enum membership) and
//! `validator` attributes carry the per-field bounds. Whatever the attributes
//! cannot say goes in [`Schema::extra_rules`]; canonical forms are produced by
//! [`Schema::finish`] after everything has passed, so handlers and services
//! only ever see normalized values.

pub mod appointments;
pub mod auth;
pub mod locations;
pub mod pets;
pub mod professionals;

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

pub use appointments::{AppointmentFilters, AppointmentQuery, CreateAppointment, UpdateAppointment};
pub use auth::{SignIn, SignUp};
pub use locations::{CreateLocation, LocationFilters, LocationQuery, UpdateLocation};
pub use pets::{CreatePet, PetFilters, PetQuery, UpdatePet};
pub use professionals::{
    CreateProfessional, ProfessionalFilters, ProfessionalQuery, UpdateProfessional,
};

/// Letters (accented included), spaces, apostrophes, dots and hyphens.
pub static PERSON_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L} .'\-]*$").expect("valid person name regex"));

pub trait Schema: Validate + Sized {
    type Output;

    /// Cross-field and parse-level rules, appended to the attribute errors.
    fn extra_rules(&self, _errors: &mut ValidationErrors) {}

    /// Canonical form. Only called once validation has passed.
    fn finish(self) -> Self::Output;

    fn parse(self) -> Result<Self::Output, ApiError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.extra_rules(&mut errors);
        if !errors.errors().is_empty() {
            return Err(errors.into());
        }
        Ok(self.finish())
    }
}

pub(crate) fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// Record an error when an optional enum filter does not name a variant.
pub(crate) fn check_variant<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    all: &[T],
) where
    T: std::fmt::Display,
{
    if let Some(raw) = value {
        if raw.parse::<T>().is_err() {
            errors.add(
                field,
                field_error(
                    "enum",
                    format!(
                        "Invalid value, expected one of: {}",
                        crate::database::models::expected_values(all)
                    ),
                ),
            );
        }
    }
}

/// `true`/`false` in query strings.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Query bounds accept a full RFC 3339 timestamp or a bare `YYYY-MM-DD`,
/// which means midnight UTC.
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Text filters compare case-insensitively, so blank ones are dropped here.
/// `deserialize_with` for fields whose surrounding whitespace is noise.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_names_allow_accents_and_hyphens() {
        assert!(PERSON_NAME_RE.is_match("José da Silva"));
        assert!(PERSON_NAME_RE.is_match("Anne-Marie O'Neil"));
        assert!(!PERSON_NAME_RE.is_match("R2D2"));
        assert!(!PERSON_NAME_RE.is_match(" leading"));
    }

    #[test]
    fn instants_accept_dates_and_timestamps() {
        let day = parse_instant("2030-05-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2030-05-01T00:00:00+00:00");
        let ts = parse_instant("2030-05-01T10:30:00-03:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2030-05-01T13:30:00+00:00");
        assert!(parse_instant("yesterday").is_none());
    }

    #[test]
    fn flags_and_blanks() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" rex ".into())), Some("rex".into()));
    }
}
