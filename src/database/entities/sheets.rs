use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub workbook_id: i32,
    pub project_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub agent_ids: String, // JSON int array
    pub is_deleted: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workbooks::Entity",
        from = "Column::WorkbookId",
        to = "super::workbooks::Column::Id"
    )]
    Workbooks,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(has_many = "super::sheet_columns::Entity")]
    SheetColumns,
    #[sea_orm(has_many = "super::sheet_rows::Entity")]
    SheetRows,
    #[sea_orm(has_many = "super::row_grants::Entity")]
    RowGrants,
}

impl Related<super::workbooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workbooks.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::sheet_columns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SheetColumns.def()
    }
}

impl Related<super::sheet_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SheetRows.def()
    }
}

impl Related<super::row_grants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RowGrants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn agent_id_set(&self) -> Vec<i32> {
        serde_json::from_str(&self.agent_ids).unwrap_or_default()
    }
}
