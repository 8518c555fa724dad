//! Field validation for incoming student bodies

use crate::student::{NewStudent, StudentChanges};
use chrono::NaiveDate;
use thiserror::Error;

/// Date format used for enrollment dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid date format, expected YYYY-MM-DD: {}", .0.join(", "))]
    InvalidDates(Vec<&'static str>),

    #[error("Roll number is required")]
    BlankRollNo,

    #[error("Roll number cannot be changed (path: {path}, body: {body})")]
    RollNoMismatch { path: String, body: String },
}

impl ValidationError {
    /// Offending field names, as they appear in the REST body
    pub fn fields(&self) -> Vec<String> {
        match self {
            ValidationError::MissingFields(fields) | ValidationError::InvalidDates(fields) => {
                fields.iter().map(|f| f.to_string()).collect()
            }
            ValidationError::BlankRollNo | ValidationError::RollNoMismatch { .. } => {
                vec!["rollNo".to_string()]
            }
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Whether `value` is a `YYYY-MM-DD` calendar date
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).is_ok()
}

fn check(
    required: &[(&'static str, &str)],
    dates: &[(&'static str, &str)],
) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let invalid: Vec<&'static str> = dates
        .iter()
        .filter(|(_, value)| !is_valid_date(value))
        .map(|(name, _)| *name)
        .collect();
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidDates(invalid));
    }

    Ok(())
}

/// Reject blank roll numbers (e.g. a path segment of `%20`)
pub fn validate_roll_no(roll_no: &str) -> Result<&str, ValidationError> {
    let trimmed = roll_no.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankRollNo);
    }
    Ok(trimmed)
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(
            &[
                ("rollNo", self.roll_no.as_str()),
                ("fullName", self.full_name.as_str()),
                ("class", self.class.as_str()),
                ("birthDate", self.birth_date.as_str()),
                ("address", self.address.as_str()),
            ],
            &[],
        )
    }

    /// Trim every field in place
    pub fn normalize(mut self) -> Self {
        for field in [
            &mut self.roll_no,
            &mut self.full_name,
            &mut self.class,
            &mut self.birth_date,
            &mut self.address,
        ] {
            *field = field.trim().to_string();
        }
        self
    }
}

impl StudentChanges {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(
            &[
                ("fullName", self.full_name.as_str()),
                ("class", self.class.as_str()),
                ("birthDate", self.birth_date.as_str()),
                ("address", self.address.as_str()),
                ("enrollmentDate", self.enrollment_date.as_str()),
            ],
            &[("enrollmentDate", self.enrollment_date.as_str())],
        )
    }

    pub fn normalize(mut self) -> Self {
        for field in [
            &mut self.full_name,
            &mut self.class,
            &mut self.birth_date,
            &mut self.address,
            &mut self.enrollment_date,
        ] {
            *field = field.trim().to_string();
        }
        self
    }
}
