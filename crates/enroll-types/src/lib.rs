//! Enrollment Types - Pure type definitions shared by the server and the CLI
//!
//! This crate contains only data types and field validation, with no async
//! runtime or HTTP dependencies.

pub mod api;
pub mod student;
pub mod validation;

pub use api::*;
pub use student::*;
pub use validation::{is_valid_date, validate_roll_no, ValidationError, DATE_FORMAT};

/// Current UTC date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Utc::now().format(DATE_FORMAT).to_string()
}
