//! Mutation gateway
//!
//! The single entry point other subsystems call. Reads resolve permissions,
//! fetch, and present; writes resolve permissions, validate through the
//! column type protocol, delegate to the stores, and append one operation
//! log entry per call.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::columns::{present_cell, SelectOption};
use crate::database::entities::{operation_logs, sheet_columns, sheet_rows, sheets};
use crate::errors::{GatewayResult, PermissionError, RowError};
use crate::permissions::{can_manage_schema, can_view_sheet, cell_capability, column_visible, row_visible, Actor};

use super::row_service::DEFAULT_PAGE_LIMIT;
use super::schema_service::{ColumnDraft, ColumnPatch};
use super::{ImportService, ImportSummary, RowService, SchemaService, SheetLocks, SheetScope};

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RowQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub skip: u64,
}

impl Default for RowQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            skip: 0,
        }
    }
}

/// A column as presented to one actor. The dial pool is only included for
/// actors who see full phone values.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub id: i32,
    pub name: String,
    pub data_key: String,
    pub column_type: String,
    pub visible_to_user: bool,
    pub editable_by_user: bool,
    pub is_required: bool,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<String>>,
}

impl ColumnView {
    fn for_actor(column: &sheet_columns::Model, actor: &Actor) -> Self {
        Self {
            id: column.id,
            name: column.name.clone(),
            data_key: column.data_key.clone(),
            column_type: column.column_type.clone(),
            visible_to_user: column.visible_to_user,
            editable_by_user: column.editable_by_user,
            is_required: column.is_required,
            order: column.order,
            options: column.options.as_ref().map(|_| column.select_options()),
            phone_numbers: if actor.role.sees_full_phone() {
                column.phone_numbers.as_ref().map(|_| column.phone_pool())
            } else {
                None
            },
        }
    }
}

/// A row as presented to one actor: only visible columns, values formatted
/// and masked per role.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub row_number: i64,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetPage {
    pub sheet_id: i32,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetDetail {
    #[serde(flatten)]
    pub sheet: sheets::Model,
    pub columns: Vec<ColumnView>,
}

/// One write operation against a sheet.
pub enum Op {
    CreateRow {
        data: Map<String, Value>,
    },
    PatchRow {
        row_number: i64,
        data: Map<String, Value>,
    },
    PatchCell {
        row_number: i64,
        key: String,
        value: Value,
    },
    DeleteRow {
        row_number: i64,
    },
    CreateColumn {
        draft: ColumnDraft,
    },
    UpdateColumn {
        column_id: i32,
        patch: ColumnPatch,
    },
    ReorderColumns {
        ordered_ids: Vec<i32>,
    },
    ImportRows {
        bytes: Vec<u8>,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::CreateRow { .. } => "create_row",
            Op::PatchRow { .. } => "patch_row",
            Op::PatchCell { .. } => "patch_cell",
            Op::DeleteRow { .. } => "delete_row",
            Op::CreateColumn { .. } => "create_column",
            Op::UpdateColumn { .. } => "update_column",
            Op::ReorderColumns { .. } => "reorder_columns",
            Op::ImportRows { .. } => "import_rows",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OpOutcome {
    Row(RowView),
    Deleted { row_number: i64 },
    Column(ColumnView),
    Columns(Vec<ColumnView>),
    Import(ImportSummary),
}

#[derive(Clone)]
pub struct MutationGateway {
    db: DatabaseConnection,
    schema: SchemaService,
    rows: RowService,
    import: ImportService,
}

impl MutationGateway {
    pub fn new(db: DatabaseConnection, locks: Arc<SheetLocks>) -> Self {
        Self {
            schema: SchemaService::new(db.clone()),
            rows: RowService::new(db.clone(), locks.clone()),
            import: ImportService::new(db.clone(), locks),
            db,
        }
    }

    /// A filtered, presented page of a sheet's rows and columns.
    pub async fn get(&self, actor: &Actor, sheet_id: i32, query: RowQuery) -> GatewayResult<SheetPage> {
        let scope = self.schema.load_sheet_scope(sheet_id).await?;
        let ctx = scope.context();
        if !can_view_sheet(actor, &ctx) {
            return Err(PermissionError::Forbidden.into());
        }

        let columns = self.schema.live_columns(sheet_id).await?;
        let visible: Vec<&sheet_columns::Model> = columns
            .iter()
            .filter(|c| column_visible(actor, &ctx, &c.meta()))
            .collect();

        let page = self
            .rows
            .list_rows(sheet_id, query.page, query.limit, query.skip)
            .await?;

        let rows = page
            .iter()
            .filter(|r| row_visible(actor, &ctx, r.row_number))
            .map(|r| present_row(r, &visible, actor))
            .collect();

        Ok(SheetPage {
            sheet_id,
            columns: visible.iter().map(|c| ColumnView::for_actor(c, actor)).collect(),
            rows,
        })
    }

    /// The sheet with its live columns, filtered by the actor's visibility.
    pub async fn describe(&self, actor: &Actor, sheet_id: i32) -> GatewayResult<SheetDetail> {
        let scope = self.schema.load_sheet_scope(sheet_id).await?;
        let ctx = scope.context();
        if !can_view_sheet(actor, &ctx) {
            return Err(PermissionError::Forbidden.into());
        }

        let columns = self.schema.live_columns(sheet_id).await?;
        let visible = columns
            .iter()
            .filter(|c| column_visible(actor, &ctx, &c.meta()))
            .map(|c| ColumnView::for_actor(c, actor))
            .collect();

        Ok(SheetDetail {
            sheet: scope.sheet,
            columns: visible,
        })
    }

    /// Authorize, validate, and execute one write operation, then append an
    /// operation log entry.
    pub async fn apply(&self, actor: &Actor, sheet_id: i32, op: Op) -> GatewayResult<OpOutcome> {
        let scope = self.schema.load_sheet_scope(sheet_id).await?;
        let ctx = scope.context();
        if !can_view_sheet(actor, &ctx) {
            return Err(PermissionError::Forbidden.into());
        }

        let op_name = op.name();
        let columns = self.schema.live_columns(sheet_id).await?;

        let (outcome, data_key, old_value, new_value) = match op {
            Op::CreateRow { data } => {
                self.require_schema_rights(actor, &scope)?;
                let row = self.rows.create_row(sheet_id, &columns, data).await?;
                let new = Some(row.data.clone());
                (
                    OpOutcome::Row(present_full_row(&row, &columns, actor, &ctx)),
                    None,
                    None,
                    new,
                )
            }
            Op::PatchRow { row_number, data } => {
                self.authorize_cell_writes(actor, &ctx, &columns, row_number, data.keys())?;
                let before = self.rows.get_row(sheet_id, row_number).await?;
                let row = self
                    .rows
                    .patch_row(sheet_id, &columns, row_number, data)
                    .await?;
                (
                    OpOutcome::Row(present_full_row(&row, &columns, actor, &ctx)),
                    None,
                    Some(before.data),
                    Some(row.data.clone()),
                )
            }
            Op::PatchCell {
                row_number,
                key,
                value,
            } => {
                self.authorize_cell_writes(actor, &ctx, &columns, row_number, std::iter::once(&key))?;
                let before = self.rows.get_row(sheet_id, row_number).await?;
                let old = before.data_map().get(&key).cloned().unwrap_or(Value::Null);

                let mut partial = Map::new();
                partial.insert(key.clone(), value);
                let row = self
                    .rows
                    .patch_row(sheet_id, &columns, row_number, partial)
                    .await?;
                let new = row.data_map().get(&key).cloned().unwrap_or(Value::Null);

                (
                    OpOutcome::Row(present_full_row(&row, &columns, actor, &ctx)),
                    Some(key),
                    Some(old.to_string()),
                    Some(new.to_string()),
                )
            }
            Op::DeleteRow { row_number } => {
                self.require_schema_rights(actor, &scope)?;
                let row = self.rows.delete_row(sheet_id, row_number).await?;
                (
                    OpOutcome::Deleted { row_number },
                    None,
                    Some(row.data),
                    None,
                )
            }
            Op::CreateColumn { draft } => {
                self.require_schema_rights(actor, &scope)?;
                let column = self.schema.create_column(sheet_id, draft).await?;
                let key = column.data_key.clone();
                (
                    OpOutcome::Column(ColumnView::for_actor(&column, actor)),
                    Some(key),
                    None,
                    None,
                )
            }
            Op::UpdateColumn { column_id, patch } => {
                self.require_schema_rights(actor, &scope)?;
                let before = self.schema.get_column(sheet_id, column_id).await?;
                let column = self.schema.update_column(sheet_id, column_id, patch).await?;
                let key = column.data_key.clone();
                (
                    OpOutcome::Column(ColumnView::for_actor(&column, actor)),
                    Some(key),
                    Some(before.column_type),
                    Some(column.column_type.clone()),
                )
            }
            Op::ReorderColumns { ordered_ids } => {
                self.require_schema_rights(actor, &scope)?;
                let reordered = self.schema.reorder_columns(sheet_id, &ordered_ids).await?;
                (
                    OpOutcome::Columns(
                        reordered
                            .iter()
                            .map(|c| ColumnView::for_actor(c, actor))
                            .collect(),
                    ),
                    None,
                    None,
                    None,
                )
            }
            Op::ImportRows { bytes } => {
                self.require_schema_rights(actor, &scope)?;
                let summary = self.import.import_csv(sheet_id, &columns, &bytes).await?;
                let new = serde_json::to_string(&summary).ok();
                (OpOutcome::Import(summary), None, None, new)
            }
        };

        self.log_operation(actor, op_name, sheet_id, data_key, old_value, new_value)
            .await;

        Ok(outcome)
    }

    fn require_schema_rights(&self, actor: &Actor, scope: &SheetScope) -> Result<(), PermissionError> {
        if can_manage_schema(actor, &scope.context()) {
            Ok(())
        } else {
            // 404-shaped: do not reveal the entity to actors who cannot act on it
            Err(PermissionError::Forbidden)
        }
    }

    /// Per-cell write authorization. An invisible cell is Forbidden (404
    /// shaped); a visible but non-editable cell is ReadOnlyField.
    fn authorize_cell_writes<'a>(
        &self,
        actor: &Actor,
        ctx: &crate::permissions::SheetContext,
        columns: &[sheet_columns::Model],
        row_number: i64,
        keys: impl Iterator<Item = &'a String>,
    ) -> GatewayResult<()> {
        for key in keys {
            let column = columns
                .iter()
                .find(|c| c.data_key == *key)
                .ok_or_else(|| RowError::UnknownDataKey(key.clone()))?;

            let capability = cell_capability(actor, ctx, &column.meta(), Some(row_number));
            if !capability.view {
                return Err(PermissionError::Forbidden.into());
            }
            if !capability.edit {
                return Err(PermissionError::ReadOnlyField(key.clone()).into());
            }
        }
        Ok(())
    }

    async fn log_operation(
        &self,
        actor: &Actor,
        op: &str,
        sheet_id: i32,
        data_key: Option<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        let entry = operation_logs::ActiveModel {
            actor_id: Set(actor.user_id),
            op: Set(op.to_string()),
            sheet_id: Set(sheet_id),
            data_key: Set(data_key),
            old_value: Set(old_value),
            new_value: Set(new_value),
            at: Set(Utc::now()),
            ..Default::default()
        };

        // The mutation already committed; a failed audit append must not
        // roll it back, but it is never silent either.
        if let Err(err) = entry.insert(&self.db).await {
            warn!("Failed to append operation log for {}: {}", op, err);
        }
    }
}

fn present_row(row: &sheet_rows::Model, visible: &[&sheet_columns::Model], actor: &Actor) -> RowView {
    let data = row.data_map();
    let mut presented = Map::new();

    for column in visible {
        let value = data.get(&column.data_key).cloned().unwrap_or(Value::Null);
        let column_type = match column.parsed_type() {
            Some(t) => t,
            None => continue,
        };
        presented.insert(
            column.data_key.clone(),
            present_cell(column_type, &column.select_options(), actor.role, &value),
        );
    }

    RowView {
        row_number: row.row_number,
        data: presented,
    }
}

fn present_full_row(
    row: &sheet_rows::Model,
    columns: &[sheet_columns::Model],
    actor: &Actor,
    ctx: &crate::permissions::SheetContext,
) -> RowView {
    let visible: Vec<&sheet_columns::Model> = columns
        .iter()
        .filter(|c| column_visible(actor, ctx, &c.meta()))
        .collect();
    present_row(row, &visible, actor)
}
