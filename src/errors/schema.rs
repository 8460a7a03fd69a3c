//! Schema store errors
//!
//! Errors raised while mutating the Project/Workbook/Sheet/Column tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// Company not found by id
    #[error("Company {0} not found")]
    CompanyNotFound(i32),

    /// Project not found by id (or soft-deleted)
    #[error("Project {0} not found")]
    ProjectNotFound(i32),

    /// Workbook not found by id (or soft-deleted)
    #[error("Workbook {0} not found")]
    WorkbookNotFound(i32),

    /// Sheet not found by id (or under a soft-deleted ancestor)
    #[error("Sheet {0} not found")]
    SheetNotFound(i32),

    /// Column not found by id
    #[error("Column {0} not found")]
    ColumnNotFound(i32),

    /// Row grant not found by id
    #[error("Grant {0} not found")]
    GrantNotFound(i32),

    /// Another live column in the sheet already uses this data key
    #[error("Column with data key '{0}' already exists in this sheet")]
    DuplicateDataKey(String),

    /// Select options are malformed (duplicate values, empty set, ...)
    #[error("Invalid select options: {0}")]
    InvalidOptions(String),

    /// A phone pool entry is still referenced by committed row data
    #[error("Phone number '{0}' is referenced by existing rows")]
    PoolInUse(String),

    /// Unknown column type discriminant
    #[error("Invalid column type: {0}")]
    InvalidColumnType(String),

    /// Generic schema validation failure
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl SchemaError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchemaError::CompanyNotFound(_)
                | SchemaError::ProjectNotFound(_)
                | SchemaError::WorkbookNotFound(_)
                | SchemaError::SheetNotFound(_)
                | SchemaError::ColumnNotFound(_)
                | SchemaError::GrantNotFound(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::CompanyNotFound(_)
            | SchemaError::ProjectNotFound(_)
            | SchemaError::WorkbookNotFound(_)
            | SchemaError::SheetNotFound(_)
            | SchemaError::ColumnNotFound(_)
            | SchemaError::GrantNotFound(_) => "NOT_FOUND",
            SchemaError::DuplicateDataKey(_) => "DUPLICATE_DATA_KEY",
            SchemaError::InvalidOptions(_) => "INVALID_OPTIONS",
            SchemaError::PoolInUse(_) => "POOL_IN_USE",
            SchemaError::InvalidColumnType(_) | SchemaError::Validation(_) => "VALIDATION_FAILED",
            SchemaError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            _ if self.is_not_found() => 404,
            SchemaError::DuplicateDataKey(_) | SchemaError::PoolInUse(_) => 409,
            SchemaError::InvalidOptions(_)
            | SchemaError::InvalidColumnType(_)
            | SchemaError::Validation(_) => 400,
            SchemaError::Database(_) => 500,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = SchemaError::SheetNotFound(7);
        assert!(err.is_not_found());
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Sheet 7 not found");
    }

    #[test]
    fn test_duplicate_data_key_is_conflict() {
        let err = SchemaError::DuplicateDataKey("phone".to_string());
        assert_eq!(err.http_status(), 409);
        assert_eq!(err.error_code(), "DUPLICATE_DATA_KEY");
    }

    #[test]
    fn test_pool_in_use_is_conflict() {
        let err = SchemaError::PoolInUse("99450001123".to_string());
        assert_eq!(err.http_status(), 409);
        assert_eq!(
            err.to_string(),
            "Phone number '99450001123' is referenced by existing rows"
        );
    }
}
