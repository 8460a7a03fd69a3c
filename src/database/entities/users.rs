use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::permissions::Role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub role: String, // "admin", "supervisor", "agent", "partner"
    pub is_active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operation_logs::Entity")]
    OperationLogs,
}

impl Related<super::operation_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperationLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}
