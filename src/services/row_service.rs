//! Row store: paginated CRUD over sheet rows, keyed by row number.
//!
//! Row numbers are 1-based, assigned as max+1 under a per-sheet lock, and
//! never reused: deleting a row leaves a gap so agent row grants stay
//! stable.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::columns::validate_cell;
use crate::database::entities::{sheet_columns, sheet_rows};
use crate::errors::{RowError, RowResult};

use super::SheetLocks;

pub const DEFAULT_PAGE_LIMIT: u64 = 50;

#[derive(Clone)]
pub struct RowService {
    db: DatabaseConnection,
    locks: Arc<SheetLocks>,
}

impl RowService {
    pub fn new(db: DatabaseConnection, locks: Arc<SheetLocks>) -> Self {
        Self { db, locks }
    }

    /// One page of rows ordered by row number ascending. `skip` is an extra
    /// offset layered under the page window: both exist independently in the
    /// caller contract.
    pub async fn list_rows(
        &self,
        sheet_id: i32,
        page: u64,
        limit: u64,
        skip: u64,
    ) -> RowResult<Vec<sheet_rows::Model>> {
        let page = page.max(1);
        let offset = skip + (page - 1) * limit;

        Ok(sheet_rows::Entity::find()
            .filter(sheet_rows::Column::SheetId.eq(sheet_id))
            .order_by_asc(sheet_rows::Column::RowNumber)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn get_row(&self, sheet_id: i32, row_number: i64) -> RowResult<sheet_rows::Model> {
        sheet_rows::Entity::find()
            .filter(sheet_rows::Column::SheetId.eq(sheet_id))
            .filter(sheet_rows::Column::RowNumber.eq(row_number))
            .one(&self.db)
            .await?
            .ok_or(RowError::RowNotFound {
                sheet_id,
                row_number,
            })
    }

    /// Create a row with the next free row number. Requires every required
    /// column's data key to be present in `data`; every supplied pair runs
    /// through column validation.
    pub async fn create_row(
        &self,
        sheet_id: i32,
        columns: &[sheet_columns::Model],
        data: Map<String, Value>,
    ) -> RowResult<sheet_rows::Model> {
        for column in columns.iter().filter(|c| c.is_required) {
            if !data.contains_key(&column.data_key) {
                return Err(RowError::MissingRequiredField(column.data_key.clone()));
            }
        }
        let validated = validate_payload(columns, &data)?;

        // Serialize number assignment per sheet
        let _guard = self.locks.acquire(sheet_id).await;
        let row_number = self.next_row_number(sheet_id).await?;

        let now = Utc::now();
        let row = sheet_rows::ActiveModel {
            sheet_id: Set(sheet_id),
            row_number: Set(row_number),
            data: Set(Value::Object(validated).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!("Created row {} in sheet {}", row_number, sheet_id);
        Ok(row)
    }

    /// Merge `partial` into the row's data. Touched pairs validate; untouched
    /// keys are left as committed. Last write wins.
    pub async fn patch_row(
        &self,
        sheet_id: i32,
        columns: &[sheet_columns::Model],
        row_number: i64,
        partial: Map<String, Value>,
    ) -> RowResult<sheet_rows::Model> {
        let row = self.get_row(sheet_id, row_number).await?;
        let validated = validate_payload(columns, &partial)?;

        let mut data = row.data_map();
        for (key, value) in validated {
            data.insert(key, value);
        }

        let mut active: sheet_rows::ActiveModel = row.into();
        active.data = Set(Value::Object(data).to_string());
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Hard delete. Row numbers are not compacted afterwards.
    pub async fn delete_row(&self, sheet_id: i32, row_number: i64) -> RowResult<sheet_rows::Model> {
        let row = self.get_row(sheet_id, row_number).await?;
        sheet_rows::Entity::delete_by_id(row.id).exec(&self.db).await?;
        debug!("Deleted row {} from sheet {}", row_number, sheet_id);
        Ok(row)
    }

    async fn next_row_number(&self, sheet_id: i32) -> RowResult<i64> {
        let last = sheet_rows::Entity::find()
            .filter(sheet_rows::Column::SheetId.eq(sheet_id))
            .order_by_desc(sheet_rows::Column::RowNumber)
            .one(&self.db)
            .await?;
        Ok(last.map(|r| r.row_number + 1).unwrap_or(1))
    }
}

/// Validate a data payload against the sheet's live columns: unknown keys
/// are rejected, known keys coerce through the column type protocol.
pub fn validate_payload(
    columns: &[sheet_columns::Model],
    data: &Map<String, Value>,
) -> RowResult<Map<String, Value>> {
    let mut validated = Map::new();

    for (key, raw) in data {
        let column = columns
            .iter()
            .find(|c| c.data_key == *key)
            .ok_or_else(|| RowError::UnknownDataKey(key.clone()))?;
        let column_type = column
            .parsed_type()
            .ok_or_else(|| RowError::UnknownDataKey(key.clone()))?;

        let value = validate_cell(column_type, &column.select_options(), &column.phone_pool(), raw)
            .map_err(|source| RowError::Validation {
                data_key: key.clone(),
                source,
            })?;
        validated.insert(key.clone(), value);
    }

    Ok(validated)
}
