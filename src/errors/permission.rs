//! Permission resolution errors
//!
//! `Forbidden` deliberately maps to a 404-shaped response: callers must not
//! learn whether an entity they cannot see exists.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PermissionError {
    /// Actor has no view capability on the referenced entity
    #[error("Not found")]
    Forbidden,

    /// Actor may view but not edit the referenced field
    #[error("Field '{0}' is read-only for this actor")]
    ReadOnlyField(String),
}

impl PermissionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::Forbidden => "NOT_FOUND",
            PermissionError::ReadOnlyField(_) => "READ_ONLY_FIELD",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PermissionError::Forbidden => 404,
            PermissionError::ReadOnlyField(_) => 403,
        }
    }
}
