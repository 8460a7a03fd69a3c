//! Domain error types for the gridbook engine
//!
//! Each domain (schema, rows, permissions, import) has its own structured
//! error enum. Every enum exposes `error_code()` for API payloads and
//! `http_status()` for the transport layer, so handlers never match on
//! error internals.

pub mod cell;
pub mod import;
pub mod permission;
pub mod row;
pub mod schema;

pub use cell::CellError;
pub use import::ImportError;
pub use permission::PermissionError;
pub use row::RowError;
pub use schema::SchemaError;

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type alias for row operations
pub type RowResult<T> = Result<T, RowError>;

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Combined error for the mutation gateway, which composes all four domains.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl GatewayError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Schema(e) => e.error_code(),
            GatewayError::Row(e) => e.error_code(),
            GatewayError::Permission(e) => e.error_code(),
            GatewayError::Import(e) => e.error_code(),
            GatewayError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::Schema(e) => e.http_status(),
            GatewayError::Row(e) => e.http_status(),
            GatewayError::Permission(e) => e.http_status(),
            GatewayError::Import(e) => e.http_status(),
            GatewayError::Database(_) => 500,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_delegates_status() {
        let err = GatewayError::from(PermissionError::Forbidden);
        assert_eq!(err.http_status(), 404);

        let err = GatewayError::from(SchemaError::DuplicateDataKey("status".to_string()));
        assert_eq!(err.http_status(), 409);
        assert_eq!(err.error_code(), "DUPLICATE_DATA_KEY");
    }
}
