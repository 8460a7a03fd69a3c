//! Schema store: CRUD over the Project → Workbook → Sheet → Column tree.
//!
//! All lookups exclude soft-deleted records and records under soft-deleted
//! ancestors. Row-facing callers load the whole ancestry through
//! `load_sheet_scope`, which is what makes the logical cascade hold.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;

use crate::columns::{ColumnType, SelectOption};
use crate::database::entities::{
    companies, projects, row_grants, sheet_columns, sheets, workbooks,
};
use crate::errors::{SchemaError, SchemaResult};

use super::SheetScope;

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDraft {
    pub company_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub project_type: String,
    pub project_direction: String,
    pub project_kind: String,
    #[serde(default)]
    pub supervisor_ids: Vec<i32>,
    #[serde(default)]
    pub agent_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
    pub project_direction: Option<String>,
    pub project_kind: Option<String>,
    pub supervisor_ids: Option<Vec<i32>>,
    pub agent_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookDraft {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub agent_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkbookPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub agent_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetDraft {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub agent_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SheetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub agent_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDraft {
    pub name: String,
    pub data_key: String,
    pub column_type: String,
    #[serde(default = "default_true")]
    pub visible_to_user: bool,
    #[serde(default = "default_true")]
    pub editable_by_user: bool,
    #[serde(default)]
    pub is_required: bool,
    pub order: Option<i32>,
    pub options: Option<Vec<SelectOption>>,
    pub phone_numbers: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub data_key: Option<String>,
    pub column_type: Option<String>,
    pub visible_to_user: Option<bool>,
    pub editable_by_user: Option<bool>,
    pub is_required: Option<bool>,
    pub order: Option<i32>,
    pub options: Option<Vec<SelectOption>>,
    pub phone_numbers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantDraft {
    pub agent_id: i32,
    pub start_row: i64,
    pub end_row: i64,
}

#[derive(Clone)]
pub struct SchemaService {
    db: DatabaseConnection,
}

impl SchemaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ----- Companies -------------------------------------------------------

    pub async fn create_company(&self, name: String, domain: String) -> SchemaResult<companies::Model> {
        let now = Utc::now();
        let company = companies::ActiveModel {
            name: Set(name),
            domain: Set(domain),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(company)
    }

    pub async fn list_companies(&self) -> SchemaResult<Vec<companies::Model>> {
        Ok(companies::Entity::find().all(&self.db).await?)
    }

    pub async fn get_company(&self, id: i32) -> SchemaResult<companies::Model> {
        companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SchemaError::CompanyNotFound(id))
    }

    // ----- Projects --------------------------------------------------------

    pub async fn create_project(&self, draft: ProjectDraft) -> SchemaResult<projects::Model> {
        self.get_company(draft.company_id).await?;

        projects::ProjectType::parse(&draft.project_type)
            .ok_or_else(|| SchemaError::Validation(format!("invalid project type '{}'", draft.project_type)))?;
        projects::ProjectDirection::parse(&draft.project_direction).ok_or_else(|| {
            SchemaError::Validation(format!("invalid project direction '{}'", draft.project_direction))
        })?;
        projects::ProjectKind::parse(&draft.project_kind)
            .ok_or_else(|| SchemaError::Validation(format!("invalid project kind '{}'", draft.project_kind)))?;

        let now = Utc::now();
        let project = projects::ActiveModel {
            company_id: Set(draft.company_id),
            name: Set(draft.name),
            description: Set(draft.description),
            project_type: Set(draft.project_type),
            project_direction: Set(draft.project_direction),
            project_kind: Set(draft.project_kind),
            supervisor_ids: Set(to_id_json(&draft.supervisor_ids)),
            agent_ids: Set(to_id_json(&draft.agent_ids)),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created project {} in company {}", project.id, project.company_id);
        Ok(project)
    }

    pub async fn list_projects(&self) -> SchemaResult<Vec<projects::Model>> {
        Ok(projects::Entity::find()
            .filter(projects::Column::IsDeleted.eq(false))
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_project(&self, id: i32) -> SchemaResult<projects::Model> {
        projects::Entity::find_by_id(id)
            .filter(projects::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::ProjectNotFound(id))
    }

    pub async fn update_project(&self, id: i32, patch: ProjectPatch) -> SchemaResult<projects::Model> {
        let project = self.get_project(id).await?;
        let mut active: projects::ActiveModel = project.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(project_type) = patch.project_type {
            projects::ProjectType::parse(&project_type)
                .ok_or_else(|| SchemaError::Validation(format!("invalid project type '{}'", project_type)))?;
            active.project_type = Set(project_type);
        }
        if let Some(direction) = patch.project_direction {
            projects::ProjectDirection::parse(&direction)
                .ok_or_else(|| SchemaError::Validation(format!("invalid project direction '{}'", direction)))?;
            active.project_direction = Set(direction);
        }
        if let Some(kind) = patch.project_kind {
            projects::ProjectKind::parse(&kind)
                .ok_or_else(|| SchemaError::Validation(format!("invalid project kind '{}'", kind)))?;
            active.project_kind = Set(kind);
        }
        if let Some(supervisors) = patch.supervisor_ids {
            active.supervisor_ids = Set(to_id_json(&supervisors));
        }
        if let Some(agents) = patch.agent_ids {
            active.agent_ids = Set(to_id_json(&agents));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_project(&self, id: i32) -> SchemaResult<()> {
        let project = self.get_project(id).await?;
        let mut active: projects::ActiveModel = project.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        info!("Soft-deleted project {}", id);
        Ok(())
    }

    // ----- Workbooks -------------------------------------------------------

    pub async fn create_workbook(&self, project_id: i32, draft: WorkbookDraft) -> SchemaResult<workbooks::Model> {
        self.get_project(project_id).await?;

        let now = Utc::now();
        let workbook = workbooks::ActiveModel {
            project_id: Set(project_id),
            name: Set(draft.name),
            description: Set(draft.description),
            agent_ids: Set(to_id_json(&draft.agent_ids)),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(workbook)
    }

    pub async fn list_workbooks(&self, project_id: i32) -> SchemaResult<Vec<workbooks::Model>> {
        self.get_project(project_id).await?;
        Ok(workbooks::Entity::find()
            .filter(workbooks::Column::ProjectId.eq(project_id))
            .filter(workbooks::Column::IsDeleted.eq(false))
            .order_by_asc(workbooks::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_workbook(&self, id: i32) -> SchemaResult<workbooks::Model> {
        let workbook = workbooks::Entity::find_by_id(id)
            .filter(workbooks::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::WorkbookNotFound(id))?;
        // Ancestor must still be addressable
        self.get_project(workbook.project_id)
            .await
            .map_err(|_| SchemaError::WorkbookNotFound(id))?;
        Ok(workbook)
    }

    pub async fn update_workbook(&self, id: i32, patch: WorkbookPatch) -> SchemaResult<workbooks::Model> {
        let workbook = self.get_workbook(id).await?;
        let mut active: workbooks::ActiveModel = workbook.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(agents) = patch.agent_ids {
            active.agent_ids = Set(to_id_json(&agents));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_workbook(&self, id: i32) -> SchemaResult<()> {
        let workbook = self.get_workbook(id).await?;
        let mut active: workbooks::ActiveModel = workbook.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    // ----- Sheets ----------------------------------------------------------

    pub async fn create_sheet(&self, workbook_id: i32, draft: SheetDraft) -> SchemaResult<sheets::Model> {
        let workbook = self.get_workbook(workbook_id).await?;

        let now = Utc::now();
        let sheet = sheets::ActiveModel {
            workbook_id: Set(workbook.id),
            project_id: Set(workbook.project_id),
            name: Set(draft.name),
            description: Set(draft.description),
            agent_ids: Set(to_id_json(&draft.agent_ids)),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(sheet)
    }

    pub async fn list_sheets(&self, workbook_id: i32) -> SchemaResult<Vec<sheets::Model>> {
        self.get_workbook(workbook_id).await?;
        Ok(sheets::Entity::find()
            .filter(sheets::Column::WorkbookId.eq(workbook_id))
            .filter(sheets::Column::IsDeleted.eq(false))
            .order_by_asc(sheets::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn update_sheet(&self, id: i32, patch: SheetPatch) -> SchemaResult<sheets::Model> {
        let scope = self.load_sheet_scope(id).await?;
        let mut active: sheets::ActiveModel = scope.sheet.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(agents) = patch.agent_ids {
            active.agent_ids = Set(to_id_json(&agents));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_sheet(&self, id: i32) -> SchemaResult<()> {
        let scope = self.load_sheet_scope(id).await?;
        let mut active: sheets::ActiveModel = scope.sheet.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Resolve a sheet together with its live ancestry and row grants.
    /// Any missing or soft-deleted link reports the sheet itself as absent.
    pub async fn load_sheet_scope(&self, sheet_id: i32) -> SchemaResult<SheetScope> {
        let sheet = sheets::Entity::find_by_id(sheet_id)
            .filter(sheets::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::SheetNotFound(sheet_id))?;

        let workbook = workbooks::Entity::find_by_id(sheet.workbook_id)
            .filter(workbooks::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::SheetNotFound(sheet_id))?;

        let project = projects::Entity::find_by_id(sheet.project_id)
            .filter(projects::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::SheetNotFound(sheet_id))?;

        let grants = row_grants::Entity::find()
            .filter(row_grants::Column::SheetId.eq(sheet_id))
            .all(&self.db)
            .await?;

        Ok(SheetScope {
            project,
            workbook,
            sheet,
            grants,
        })
    }

    // ----- Columns ---------------------------------------------------------

    /// Live columns of a sheet in display order; ties break by insertion id.
    pub async fn live_columns(&self, sheet_id: i32) -> SchemaResult<Vec<sheet_columns::Model>> {
        Ok(sheet_columns::Entity::find()
            .filter(sheet_columns::Column::SheetId.eq(sheet_id))
            .filter(sheet_columns::Column::IsDeleted.eq(false))
            .order_by_asc(sheet_columns::Column::Order)
            .order_by_asc(sheet_columns::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_column(&self, sheet_id: i32, column_id: i32) -> SchemaResult<sheet_columns::Model> {
        sheet_columns::Entity::find_by_id(column_id)
            .filter(sheet_columns::Column::SheetId.eq(sheet_id))
            .filter(sheet_columns::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::ColumnNotFound(column_id))
    }

    pub async fn create_column(&self, sheet_id: i32, draft: ColumnDraft) -> SchemaResult<sheet_columns::Model> {
        let column_type = ColumnType::parse(&draft.column_type)
            .ok_or_else(|| SchemaError::InvalidColumnType(draft.column_type.clone()))?;

        if draft.name.trim().is_empty() {
            return Err(SchemaError::Validation("column name must not be empty".to_string()));
        }
        if draft.data_key.trim().is_empty() {
            return Err(SchemaError::Validation("data key must not be empty".to_string()));
        }

        let existing = self.live_columns(sheet_id).await?;
        if existing.iter().any(|c| c.data_key == draft.data_key) {
            return Err(SchemaError::DuplicateDataKey(draft.data_key));
        }

        let options = validate_options(column_type, draft.options)?;
        let pool = validate_pool(column_type, draft.phone_numbers)?;

        let order = draft
            .order
            .unwrap_or_else(|| existing.iter().map(|c| c.order).max().unwrap_or(0) + 1);

        let now = Utc::now();
        let column = sheet_columns::ActiveModel {
            sheet_id: Set(sheet_id),
            name: Set(draft.name),
            data_key: Set(draft.data_key),
            column_type: Set(column_type.as_str().to_string()),
            visible_to_user: Set(draft.visible_to_user),
            editable_by_user: Set(draft.editable_by_user),
            is_required: Set(draft.is_required),
            order: Set(order),
            options: Set(options),
            phone_numbers: Set(pool),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created column {} ({}) in sheet {}", column.id, column.data_key, sheet_id);
        Ok(column)
    }

    pub async fn update_column(
        &self,
        sheet_id: i32,
        column_id: i32,
        patch: ColumnPatch,
    ) -> SchemaResult<sheet_columns::Model> {
        let column = self.get_column(sheet_id, column_id).await?;
        let old_type = column
            .parsed_type()
            .ok_or_else(|| SchemaError::InvalidColumnType(column.column_type.clone()))?;
        let new_type = match &patch.column_type {
            Some(t) => ColumnType::parse(t).ok_or_else(|| SchemaError::InvalidColumnType(t.clone()))?,
            None => old_type,
        };

        if let Some(data_key) = &patch.data_key {
            let peers = self.live_columns(sheet_id).await?;
            if peers.iter().any(|c| c.id != column_id && c.data_key == *data_key) {
                return Err(SchemaError::DuplicateDataKey(data_key.clone()));
            }
        }

        let old_pool = column.phone_pool();
        let data_key = patch.data_key.clone().unwrap_or_else(|| column.data_key.clone());

        // Retyping away from Phone drops the pool, but only when no committed
        // row still references a pool entry.
        let pool = if old_type == ColumnType::Phone && new_type != ColumnType::Phone {
            if let Some(entry) = self.first_pool_entry_in_use(sheet_id, &column.data_key, &old_pool).await? {
                return Err(SchemaError::PoolInUse(entry));
            }
            None
        } else if new_type == ColumnType::Phone {
            match patch.phone_numbers.clone() {
                Some(new_pool) => {
                    let removed: Vec<String> = old_pool
                        .iter()
                        .filter(|e| !new_pool.contains(e))
                        .cloned()
                        .collect();
                    if let Some(entry) = self.first_pool_entry_in_use(sheet_id, &column.data_key, &removed).await? {
                        return Err(SchemaError::PoolInUse(entry));
                    }
                    validate_pool(new_type, Some(new_pool))?
                }
                None => column.phone_numbers.clone(),
            }
        } else {
            validate_pool(new_type, patch.phone_numbers.clone())?
        };

        // Retyping away from Select clears the options unconditionally.
        let options = if new_type != ColumnType::Select {
            if patch.options.is_some() {
                return Err(SchemaError::InvalidOptions(
                    "options are only valid on select columns".to_string(),
                ));
            }
            None
        } else {
            match patch.options.clone() {
                Some(opts) => validate_options(new_type, Some(opts))?,
                None if old_type == ColumnType::Select => column.options.clone(),
                None => None,
            }
        };

        let mut active: sheet_columns::ActiveModel = column.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        active.data_key = Set(data_key);
        active.column_type = Set(new_type.as_str().to_string());
        if let Some(visible) = patch.visible_to_user {
            active.visible_to_user = Set(visible);
        }
        if let Some(editable) = patch.editable_by_user {
            active.editable_by_user = Set(editable);
        }
        if let Some(required) = patch.is_required {
            active.is_required = Set(required);
        }
        if let Some(order) = patch.order {
            active.order = Set(order);
        }
        active.options = Set(options);
        active.phone_numbers = Set(pool);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_column(&self, sheet_id: i32, column_id: i32) -> SchemaResult<()> {
        let column = self.get_column(sheet_id, column_id).await?;
        let mut active: sheet_columns::ActiveModel = column.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Rewrite display order 1..n following `ordered_ids`, which must be
    /// exactly the sheet's live column ids.
    pub async fn reorder_columns(
        &self,
        sheet_id: i32,
        ordered_ids: &[i32],
    ) -> SchemaResult<Vec<sheet_columns::Model>> {
        let columns = self.live_columns(sheet_id).await?;

        let mut live_ids: Vec<i32> = columns.iter().map(|c| c.id).collect();
        let mut requested = ordered_ids.to_vec();
        live_ids.sort_unstable();
        requested.sort_unstable();
        if live_ids != requested {
            return Err(SchemaError::Validation(
                "ordered ids must cover exactly the sheet's columns".to_string(),
            ));
        }

        let now = Utc::now();
        for (rank, id) in ordered_ids.iter().enumerate() {
            let column = columns
                .iter()
                .find(|c| c.id == *id)
                .cloned()
                .ok_or(SchemaError::ColumnNotFound(*id))?;
            let mut active: sheet_columns::ActiveModel = column.into();
            active.order = Set(rank as i32 + 1);
            active.updated_at = Set(now);
            active.update(&self.db).await?;
        }

        self.live_columns(sheet_id).await
    }

    /// First pool entry among `entries` still present as a committed row
    /// value for `data_key`, if any.
    async fn first_pool_entry_in_use(
        &self,
        sheet_id: i32,
        data_key: &str,
        entries: &[String],
    ) -> SchemaResult<Option<String>> {
        if entries.is_empty() {
            return Ok(None);
        }

        use crate::database::entities::sheet_rows;
        let rows = sheet_rows::Entity::find()
            .filter(sheet_rows::Column::SheetId.eq(sheet_id))
            .all(&self.db)
            .await?;

        for row in rows {
            if let Some(value) = row.data_map().get(data_key).and_then(|v| v.as_str().map(String::from)) {
                if entries.iter().any(|e| *e == value) {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    // ----- Row grants ------------------------------------------------------

    pub async fn list_grants(&self, sheet_id: i32) -> SchemaResult<Vec<row_grants::Model>> {
        Ok(row_grants::Entity::find()
            .filter(row_grants::Column::SheetId.eq(sheet_id))
            .order_by_asc(row_grants::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_grant(&self, sheet_id: i32, draft: GrantDraft) -> SchemaResult<row_grants::Model> {
        if draft.start_row < 1 || draft.end_row < draft.start_row {
            return Err(SchemaError::Validation(
                "grant range must satisfy 1 <= start_row <= end_row".to_string(),
            ));
        }

        let grant = row_grants::ActiveModel {
            sheet_id: Set(sheet_id),
            agent_id: Set(draft.agent_id),
            start_row: Set(draft.start_row),
            end_row: Set(draft.end_row),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(grant)
    }

    pub async fn delete_grant(&self, sheet_id: i32, grant_id: i32) -> SchemaResult<()> {
        let grant = row_grants::Entity::find_by_id(grant_id)
            .filter(row_grants::Column::SheetId.eq(sheet_id))
            .one(&self.db)
            .await?
            .ok_or(SchemaError::GrantNotFound(grant_id))?;

        row_grants::Entity::delete_by_id(grant.id).exec(&self.db).await?;
        Ok(())
    }
}

fn to_id_json(ids: &[i32]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

fn validate_options(
    column_type: ColumnType,
    options: Option<Vec<SelectOption>>,
) -> SchemaResult<Option<String>> {
    match (column_type, options) {
        (_, None) => Ok(None),
        (ColumnType::Select, Some(opts)) => {
            for (i, a) in opts.iter().enumerate() {
                if opts.iter().skip(i + 1).any(|b| b.value == a.value) {
                    return Err(SchemaError::InvalidOptions(format!(
                        "duplicate option value '{}'",
                        a.value
                    )));
                }
            }
            Ok(Some(
                serde_json::to_string(&opts).unwrap_or_else(|_| "[]".to_string()),
            ))
        }
        (_, Some(_)) => Err(SchemaError::InvalidOptions(
            "options are only valid on select columns".to_string(),
        )),
    }
}

fn validate_pool(column_type: ColumnType, pool: Option<Vec<String>>) -> SchemaResult<Option<String>> {
    match (column_type, pool) {
        (_, None) => Ok(None),
        (ColumnType::Phone, Some(numbers)) => {
            for (i, a) in numbers.iter().enumerate() {
                if numbers.iter().skip(i + 1).any(|b| b == a) {
                    return Err(SchemaError::Validation(format!(
                        "duplicate phone pool entry '{}'",
                        a
                    )));
                }
            }
            Ok(Some(
                serde_json::to_string(&numbers).unwrap_or_else(|_| "[]".to_string()),
            ))
        }
        (_, Some(_)) => Err(SchemaError::Validation(
            "phone_numbers are only valid on phone columns".to_string(),
        )),
    }
}
