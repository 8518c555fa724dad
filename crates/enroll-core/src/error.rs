//! Error types for the enrollment core
//!
//! Only construction can fail. Data-path operations report remote trouble
//! through [`crate::Remote::Unreachable`] instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrollError>;

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
