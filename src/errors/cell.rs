//! Validation errors for a single cell value
//!
//! Produced by the column type protocol when a raw value fails to coerce
//! into its column's type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    /// Value was not a string where one was required
    #[error("Expected a string value, got '{0}'")]
    NotAString(String),

    /// Value did not parse to a finite number
    #[error("'{0}' is not a finite number")]
    InvalidNumber(String),

    /// Value did not parse to a calendar date
    #[error("'{0}' is not a calendar date")]
    InvalidDate(String),

    /// Select value does not match any configured option
    #[error("'{0}' is not one of the configured options")]
    InvalidOption(String),

    /// Phone value is not a member of the column's dial pool
    #[error("'{0}' is not in the phone pool")]
    NotInPool(String),
}

impl CellError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CellError::NotAString(_) => "VALIDATION_FAILED",
            CellError::InvalidNumber(_) => "VALIDATION_FAILED",
            CellError::InvalidDate(_) => "VALIDATION_FAILED",
            CellError::InvalidOption(_) => "INVALID_OPTION",
            CellError::NotInPool(_) => "NOT_IN_POOL",
        }
    }
}
