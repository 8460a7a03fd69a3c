use anyhow::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::info;

use crate::database::entities::{
    companies, projects, row_grants, sheet_columns, sheets, users, workbooks,
};
use crate::permissions::Role;

/// Create a demo tenant with one user per role, a project, a workbook, a
/// sheet with the common column kinds, and a starter row grant. Safe to run
/// repeatedly.
pub async fn create_demo_tenant(db: &DatabaseConnection) -> Result<()> {
    let existing = companies::Entity::find()
        .filter(companies::Column::Domain.eq("demo.gridbook.local"))
        .one(db)
        .await?;

    if existing.is_some() {
        info!("Demo tenant already exists, skipping seed data creation");
        return Ok(());
    }

    info!("Creating demo tenant");
    let now = Utc::now();

    let company = companies::ActiveModel {
        name: Set("Demo Operations".to_string()),
        domain: Set("demo.gridbook.local".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut ids = Vec::new();
    for (email, name, role) in [
        ("admin@demo.gridbook.local", "Demo Admin", Role::Admin),
        (
            "supervisor@demo.gridbook.local",
            "Demo Supervisor",
            Role::Supervisor,
        ),
        ("agent@demo.gridbook.local", "Demo Agent", Role::Agent),
        ("partner@demo.gridbook.local", "Demo Partner", Role::Partner),
    ] {
        let user = users::ActiveModel {
            email: Set(email.to_string()),
            display_name: Set(name.to_string()),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!("Created {} user with id {}", role.as_str(), user.id);
        ids.push(user.id);
    }
    let (supervisor_id, agent_id) = (ids[1], ids[2]);

    let project = projects::ActiveModel {
        company_id: Set(company.id),
        name: Set("Demo Telesales Campaign".to_string()),
        description: Set(Some("Seeded campaign for local development".to_string())),
        project_type: Set("outbound".to_string()),
        project_direction: Set("call".to_string()),
        project_kind: Set("telesales".to_string()),
        supervisor_ids: Set(serde_json::to_string(&[supervisor_id])?),
        agent_ids: Set(serde_json::to_string(&[agent_id])?),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let workbook = workbooks::ActiveModel {
        project_id: Set(project.id),
        name: Set("Lead Book".to_string()),
        description: Set(None),
        agent_ids: Set(serde_json::to_string(&[agent_id])?),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let sheet = sheets::ActiveModel {
        workbook_id: Set(workbook.id),
        project_id: Set(project.id),
        name: Set("Week 1 Leads".to_string()),
        description: Set(None),
        agent_ids: Set(serde_json::to_string(&[agent_id])?),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let columns: Vec<(&str, &str, &str, Option<String>, Option<String>)> = vec![
        ("Lead Name", "lead_name", "text", None, None),
        ("Call Date", "call_date", "date", None, None),
        (
            "Status",
            "status",
            "select",
            Some(
                serde_json::json!([
                    {"value": "new", "label": "New", "color": "#74c0fc"},
                    {"value": "contacted", "label": "Contacted", "color": "#ffd43b"},
                    {"value": "closed", "label": "Closed", "color": "#51cf66"}
                ])
                .to_string(),
            ),
            None,
        ),
        (
            "Phone",
            "phone",
            "phone",
            None,
            Some(serde_json::json!(["994500001123", "994500001124"]).to_string()),
        ),
    ];

    for (order, (name, data_key, column_type, options, pool)) in columns.into_iter().enumerate() {
        sheet_columns::ActiveModel {
            sheet_id: Set(sheet.id),
            name: Set(name.to_string()),
            data_key: Set(data_key.to_string()),
            column_type: Set(column_type.to_string()),
            visible_to_user: Set(true),
            editable_by_user: Set(column_type != "phone"),
            is_required: Set(data_key == "lead_name"),
            order: Set(order as i32 + 1),
            options: Set(options),
            phone_numbers: Set(pool),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    row_grants::ActiveModel {
        sheet_id: Set(sheet.id),
        agent_id: Set(agent_id),
        start_row: Set(1),
        end_row: Set(50),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Demo tenant ready: company {}, project {}, sheet {}",
        company.id, project.id, sheet.id
    );
    Ok(())
}
