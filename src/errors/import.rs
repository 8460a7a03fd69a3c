//! Bulk import errors
//!
//! Imports are all-or-nothing: the first failing cell aborts the whole file
//! and is reported with its 1-based data-row index and data key.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Sheet not found
    #[error("Sheet {0} not found")]
    SheetNotFound(i32),

    /// A CSV header has no exactly-matching column name
    #[error("Header '{0}' does not match any column")]
    UnknownColumn(String),

    /// A required column is absent from the CSV header row
    #[error("Required column '{0}' is missing from the file")]
    MissingRequiredColumn(String),

    /// The uploaded file has no header row
    #[error("Import file is empty")]
    EmptyFile,

    /// A cell failed validation; aborts the whole import
    #[error("Import failed at row {row}, column '{data_key}': {reason}")]
    Validation {
        row: usize,
        data_key: String,
        reason: String,
    },

    /// CSV parsing failed
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ImportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportError::SheetNotFound(_) => "NOT_FOUND",
            ImportError::UnknownColumn(_) => "UNKNOWN_COLUMN",
            ImportError::MissingRequiredColumn(_) => "MISSING_REQUIRED_COLUMN",
            ImportError::EmptyFile => "EMPTY_FILE",
            ImportError::Validation { .. } => "IMPORT_VALIDATION_ERROR",
            ImportError::Csv(_) => "INVALID_CSV",
            ImportError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ImportError::SheetNotFound(_) => 404,
            ImportError::Database(_) => 500,
            _ => 400,
        }
    }
}
