//! Bulk CSV import
//!
//! Headers map to columns by exact display-name match. Every cell is
//! validated before anything is written; the whole file then commits inside
//! one transaction under the sheet's write lock, or not at all.

use std::sync::Arc;

use chrono::Utc;
use csv::ReaderBuilder;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::columns::validate_cell;
use crate::database::entities::{sheet_columns, sheet_rows};
use crate::errors::{ImportError, ImportResult};

use super::SheetLocks;

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_imported: usize,
}

#[derive(Clone)]
pub struct ImportService {
    db: DatabaseConnection,
    locks: Arc<SheetLocks>,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, locks: Arc<SheetLocks>) -> Self {
        Self { db, locks }
    }

    /// Parse, validate, and commit a CSV file into a sheet. All-or-nothing:
    /// the first failing cell aborts the import with its 1-based data-row
    /// index and data key, and nothing is written.
    pub async fn import_csv(
        &self,
        sheet_id: i32,
        columns: &[sheet_columns::Model],
        bytes: &[u8],
    ) -> ImportResult<ImportSummary> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        // Map each header to its column by exact name match
        let mut mapped: Vec<&sheet_columns::Model> = Vec::with_capacity(headers.len());
        for header in headers.iter() {
            let column = columns
                .iter()
                .find(|c| c.name == header)
                .ok_or_else(|| ImportError::UnknownColumn(header.to_string()))?;
            mapped.push(column);
        }

        for required in columns.iter().filter(|c| c.is_required) {
            if !mapped.iter().any(|c| c.id == required.id) {
                return Err(ImportError::MissingRequiredColumn(required.name.clone()));
            }
        }

        // Validate every cell before touching the database
        let mut validated_rows: Vec<Map<String, Value>> = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row_index = index + 1;
            let mut data = Map::new();

            for (column, raw) in mapped.iter().zip(record.iter()) {
                let raw = raw.trim();
                if raw.is_empty() {
                    if column.is_required {
                        return Err(ImportError::Validation {
                            row: row_index,
                            data_key: column.data_key.clone(),
                            reason: "missing required value".to_string(),
                        });
                    }
                    continue;
                }

                let column_type = column.parsed_type().ok_or_else(|| ImportError::Validation {
                    row: row_index,
                    data_key: column.data_key.clone(),
                    reason: format!("column has unknown type '{}'", column.column_type),
                })?;

                let value = validate_cell(
                    column_type,
                    &column.select_options(),
                    &column.phone_pool(),
                    &Value::String(raw.to_string()),
                )
                .map_err(|e| ImportError::Validation {
                    row: row_index,
                    data_key: column.data_key.clone(),
                    reason: e.to_string(),
                })?;
                data.insert(column.data_key.clone(), value);
            }

            validated_rows.push(data);
        }

        // Commit under the sheet lock so numbering cannot interleave with
        // concurrent create_row calls
        let _guard = self.locks.acquire(sheet_id).await;

        let next = sheet_rows::Entity::find()
            .filter(sheet_rows::Column::SheetId.eq(sheet_id))
            .order_by_desc(sheet_rows::Column::RowNumber)
            .one(&self.db)
            .await?
            .map(|r| r.row_number + 1)
            .unwrap_or(1);

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let count = validated_rows.len();
        for (offset, data) in validated_rows.into_iter().enumerate() {
            sheet_rows::ActiveModel {
                sheet_id: Set(sheet_id),
                row_number: Set(next + offset as i64),
                data: Set(Value::Object(data).to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!("Imported {} rows into sheet {}", count, sheet_id);
        Ok(ImportSummary {
            rows_imported: count,
        })
    }
}
