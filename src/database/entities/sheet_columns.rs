use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::columns::{ColumnType, SelectOption};
use crate::permissions::ColumnMeta;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheet_columns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sheet_id: i32,
    pub name: String,
    pub data_key: String,     // stable machine key, unique among a sheet's live columns
    pub column_type: String,  // "text", "number", "date", "select", "phone"
    pub visible_to_user: bool,
    pub editable_by_user: bool,
    pub is_required: bool,
    pub order: i32,
    pub options: Option<String>,       // JSON [{value,label,color?}], select only
    pub phone_numbers: Option<String>, // JSON string array, phone only (dial pool)
    pub is_deleted: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sheets::Entity",
        from = "Column::SheetId",
        to = "super::sheets::Column::Id"
    )]
    Sheets,
}

impl Related<super::sheets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn parsed_type(&self) -> Option<ColumnType> {
        ColumnType::parse(&self.column_type)
    }

    pub fn select_options(&self) -> Vec<SelectOption> {
        self.options
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    pub fn phone_pool(&self) -> Vec<String> {
        self.phone_numbers
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    pub fn meta(&self) -> ColumnMeta {
        ColumnMeta {
            // Unknown discriminants never occur past create/update validation
            column_type: self.parsed_type().unwrap_or(ColumnType::Text),
            visible_to_user: self.visible_to_user,
            editable_by_user: self.editable_by_user,
        }
    }
}
