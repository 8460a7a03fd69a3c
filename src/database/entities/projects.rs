use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub project_type: String,      // "outbound", "inbound"
    pub project_direction: String, // "call", "social"
    pub project_kind: String,      // "survey", "telesales", "telemarketing"
    pub supervisor_ids: String,    // JSON int array
    pub agent_ids: String,         // JSON int array
    pub is_deleted: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::workbooks::Entity")]
    Workbooks,
    #[sea_orm(has_many = "super::sheets::Entity")]
    Sheets,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::workbooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workbooks.def()
    }
}

impl Related<super::sheets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Outbound,
    Inbound,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Outbound => "outbound",
            ProjectType::Inbound => "inbound",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "outbound" => Some(ProjectType::Outbound),
            "inbound" => Some(ProjectType::Inbound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectDirection {
    Call,
    Social,
}

impl ProjectDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectDirection::Call => "call",
            ProjectDirection::Social => "social",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(ProjectDirection::Call),
            "social" => Some(ProjectDirection::Social),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Survey,
    Telesales,
    Telemarketing,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Survey => "survey",
            ProjectKind::Telesales => "telesales",
            ProjectKind::Telemarketing => "telemarketing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "survey" => Some(ProjectKind::Survey),
            "telesales" => Some(ProjectKind::Telesales),
            "telemarketing" => Some(ProjectKind::Telemarketing),
            _ => None,
        }
    }
}

impl Model {
    pub fn supervisor_id_set(&self) -> Vec<i32> {
        serde_json::from_str(&self.supervisor_ids).unwrap_or_default()
    }

    pub fn agent_id_set(&self) -> Vec<i32> {
        serde_json::from_str(&self.agent_ids).unwrap_or_default()
    }

    pub fn has_supervisor(&self, user_id: i32) -> bool {
        self.supervisor_id_set().contains(&user_id)
    }
}
