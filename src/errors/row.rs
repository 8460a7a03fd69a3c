//! Row store errors

use thiserror::Error;

use super::cell::CellError;

#[derive(Error, Debug)]
pub enum RowError {
    /// Sheet not found (or unaddressable through a soft-deleted ancestor)
    #[error("Sheet {0} not found")]
    SheetNotFound(i32),

    /// Row not found by number within the sheet
    #[error("Row {row_number} not found in sheet {sheet_id}")]
    RowNotFound { sheet_id: i32, row_number: i64 },

    /// A required column's data key is absent from the payload
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Payload references a data key no live column defines
    #[error("Unknown data key: {0}")]
    UnknownDataKey(String),

    /// A cell value failed column type validation
    #[error("Invalid value for '{data_key}': {source}")]
    Validation {
        data_key: String,
        #[source]
        source: CellError,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RowError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RowError::SheetNotFound(_) | RowError::RowNotFound { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RowError::SheetNotFound(_) | RowError::RowNotFound { .. } => "NOT_FOUND",
            RowError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            RowError::UnknownDataKey(_) => "UNKNOWN_DATA_KEY",
            RowError::Validation { source, .. } => source.error_code(),
            RowError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            RowError::SheetNotFound(_) | RowError::RowNotFound { .. } => 404,
            RowError::MissingRequiredField(_)
            | RowError::UnknownDataKey(_)
            | RowError::Validation { .. } => 400,
            RowError::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_message() {
        let err = RowError::RowNotFound {
            sheet_id: 3,
            row_number: 9,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Row 9 not found in sheet 3");
    }

    #[test]
    fn test_validation_carries_cell_code() {
        let err = RowError::Validation {
            data_key: "status".to_string(),
            source: CellError::InvalidOption("maybe".to_string()),
        };
        assert_eq!(err.error_code(), "INVALID_OPTION");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_missing_required_field() {
        let err = RowError::MissingRequiredField("lead_name".to_string());
        assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");
        assert_eq!(err.to_string(), "Missing required field: lead_name");
    }
}
