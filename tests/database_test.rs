//! Database functionality tests
//!
//! Migrations, entity operations, and the row numbering index.

use anyhow::Result;
use chrono::Utc;
use gridbook::database::entities::*;
use gridbook::database::setup_database;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn insert_company(db: &DatabaseConnection) -> Result<companies::Model> {
    let now = Utc::now();
    Ok(companies::ActiveModel {
        name: Set("Acme Ops".to_string()),
        domain: Set("acme.example".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    assert_eq!(users::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(companies::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(projects::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(workbooks::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(sheets::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(sheet_columns::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(sheet_rows::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(row_grants::Entity::find().all(&db).await?.len(), 0);
    assert_eq!(operation_logs::Entity::find().all(&db).await?.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_project_tree_crud() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let now = Utc::now();

    let company = insert_company(&db).await?;

    let project = projects::ActiveModel {
        company_id: Set(company.id),
        name: Set("Spring Campaign".to_string()),
        description: Set(Some("Outbound calls".to_string())),
        project_type: Set("outbound".to_string()),
        project_direction: Set("call".to_string()),
        project_kind: Set("telesales".to_string()),
        supervisor_ids: Set("[7]".to_string()),
        agent_ids: Set("[8,9]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    assert_eq!(project.supervisor_id_set(), vec![7]);
    assert_eq!(project.agent_id_set(), vec![8, 9]);
    assert!(project.has_supervisor(7));
    assert!(!project.has_supervisor(8));

    let workbook = workbooks::ActiveModel {
        project_id: Set(project.id),
        name: Set("Leads".to_string()),
        description: Set(None),
        agent_ids: Set("[8]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let sheet = sheets::ActiveModel {
        workbook_id: Set(workbook.id),
        project_id: Set(project.id),
        name: Set("Week 1".to_string()),
        description: Set(None),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let found = sheets::Entity::find()
        .filter(sheets::Column::WorkbookId.eq(workbook.id))
        .all(&db)
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, sheet.id);

    Ok(())
}

#[tokio::test]
async fn test_row_number_unique_per_sheet() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let now = Utc::now();

    let company = insert_company(&db).await?;
    let project = projects::ActiveModel {
        company_id: Set(company.id),
        name: Set("P".to_string()),
        description: Set(None),
        project_type: Set("inbound".to_string()),
        project_direction: Set("call".to_string()),
        project_kind: Set("survey".to_string()),
        supervisor_ids: Set("[]".to_string()),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let workbook = workbooks::ActiveModel {
        project_id: Set(project.id),
        name: Set("W".to_string()),
        description: Set(None),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let sheet = sheets::ActiveModel {
        workbook_id: Set(workbook.id),
        project_id: Set(project.id),
        name: Set("S".to_string()),
        description: Set(None),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    sheet_rows::ActiveModel {
        sheet_id: Set(sheet.id),
        row_number: Set(1),
        data: Set("{}".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    // Same number in the same sheet violates the unique index
    let duplicate = sheet_rows::ActiveModel {
        sheet_id: Set(sheet.id),
        row_number: Set(1),
        data: Set("{}".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await;
    assert!(duplicate.is_err());

    Ok(())
}

#[tokio::test]
async fn test_row_data_map_round_trip() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let now = Utc::now();

    let company = insert_company(&db).await?;
    let project = projects::ActiveModel {
        company_id: Set(company.id),
        name: Set("P".to_string()),
        description: Set(None),
        project_type: Set("outbound".to_string()),
        project_direction: Set("social".to_string()),
        project_kind: Set("telemarketing".to_string()),
        supervisor_ids: Set("[]".to_string()),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let workbook = workbooks::ActiveModel {
        project_id: Set(project.id),
        name: Set("W".to_string()),
        description: Set(None),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let sheet = sheets::ActiveModel {
        workbook_id: Set(workbook.id),
        project_id: Set(project.id),
        name: Set("S".to_string()),
        description: Set(None),
        agent_ids: Set("[]".to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let row = sheet_rows::ActiveModel {
        sheet_id: Set(sheet.id),
        row_number: Set(1),
        data: Set(r#"{"lead_name":"Ada","score":12}"#.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let map = row.data_map();
    assert_eq!(map.get("lead_name").and_then(|v| v.as_str()), Some("Ada"));
    assert_eq!(map.get("score").and_then(|v| v.as_i64()), Some(12));

    Ok(())
}

#[tokio::test]
async fn test_user_role_parsing() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let now = Utc::now();

    let user = users::ActiveModel {
        email: Set("sup@acme.example".to_string()),
        display_name: Set("Sup".to_string()),
        role: Set("supervisor".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    assert_eq!(
        user.parsed_role(),
        Some(gridbook::permissions::Role::Supervisor)
    );

    Ok(())
}
