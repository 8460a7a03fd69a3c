use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::permissions::RowGrant;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "row_grants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sheet_id: i32,
    pub agent_id: i32,
    pub start_row: i64, // inclusive
    pub end_row: i64,   // inclusive
    pub created_at: ChronoDateTimeUtc,
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

impl From<&Model> for RowGrant {
    fn from(model: &Model) -> Self {
        RowGrant {
            agent_id: model.agent_id,
            start_row: model.start_row,
            end_row: model.end_row,
        }
    }
}
