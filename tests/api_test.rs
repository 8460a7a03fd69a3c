//! API integration tests
//!
//! REST surface tests: schema CRUD, the column "new" sentinel route, row
//! paging and patching, role filtering, and error shaping.

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use gridbook::database::connection::setup_database;
use gridbook::database::entities::users;
use gridbook::server::app::create_app;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Create a test server with a file-backed sqlite database
async fn setup_test_server() -> Result<(TestServer, DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db.clone(), Some("*")).await?;
    let server = TestServer::new(app)?;

    Ok((server, db, temp_file))
}

async fn create_user(db: &DatabaseConnection, email: &str, role: &str) -> Result<i32> {
    let now = Utc::now();
    let user = users::ActiveModel {
        email: Set(email.to_string()),
        display_name: Set(email.to_string()),
        role: Set(role.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(user.id)
}

fn actor_header(user_id: i32) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-actor-id"),
        HeaderValue::from_str(&user_id.to_string()).unwrap(),
    )
}

/// Admin builds company → project → workbook → sheet, returns the ids.
async fn build_tree(
    server: &TestServer,
    admin: i32,
    supervisor: i32,
    agent: i32,
) -> Result<(i64, i64, i64, i64)> {
    let (name, value) = actor_header(admin);

    let company: Value = server
        .post("/api/v1/companies")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Acme Ops", "domain": "acme.example"}))
        .await
        .json();
    let company_id = company["id"].as_i64().unwrap();

    let project: Value = server
        .post("/api/v1/projects")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "company_id": company_id,
            "name": "Spring Campaign",
            "project_type": "outbound",
            "project_direction": "call",
            "project_kind": "telesales",
            "supervisor_ids": [supervisor],
            "agent_ids": [agent],
        }))
        .await
        .json();
    let project_id = project["id"].as_i64().unwrap();

    let workbook: Value = server
        .post(&format!("/api/v1/projects/{}/workbooks", project_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Leads", "agent_ids": [agent]}))
        .await
        .json();
    let workbook_id = workbook["id"].as_i64().unwrap();

    let sheet: Value = server
        .post(&format!("/api/v1/workbooks/{}/sheets", workbook_id))
        .add_header(name, value)
        .json(&json!({"name": "Week 1", "agent_ids": [agent]}))
        .await
        .json();
    let sheet_id = sheet["id"].as_i64().unwrap();

    Ok((company_id, project_id, workbook_id, sheet_id))
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _db, _temp_file) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "gridbook");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_missing_actor_is_unauthorized() -> Result<()> {
    let (server, _db, _temp_file) = setup_test_server().await?;

    let response = server.get("/api/v1/projects").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");

    Ok(())
}

#[tokio::test]
async fn test_projects_crud_api() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let (name, value) = actor_header(admin);

    let company: Value = server
        .post("/api/v1/companies")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Acme Ops", "domain": "acme.example"}))
        .await
        .json();
    let company_id = company["id"].as_i64().unwrap();

    // Create
    let response = server
        .post("/api/v1/projects")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "company_id": company_id,
            "name": "Test API Project",
            "description": "Created via API test",
            "project_type": "inbound",
            "project_direction": "social",
            "project_kind": "survey",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let project: Value = response.json();
    let project_id = project["id"].as_i64().unwrap();
    assert_eq!(project["name"], "Test API Project");

    // List
    let response = server
        .get("/api/v1/projects")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let projects: Vec<Value> = response.json();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], project_id);

    // Update
    let response = server
        .put(&format!("/api/v1/projects/{}", project_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Updated API Project"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Updated API Project");

    // Delete (soft)
    let response = server
        .delete(&format!("/api/v1/projects/{}", project_id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/projects/{}", project_id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_invalid_project_enum_is_rejected() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let (name, value) = actor_header(admin);

    let company: Value = server
        .post("/api/v1/companies")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Acme Ops", "domain": "acme.example"}))
        .await
        .json();

    let response = server
        .post("/api/v1/projects")
        .add_header(name, value)
        .json(&json!({
            "company_id": company["id"],
            "name": "Broken",
            "project_type": "sideways",
            "project_direction": "call",
            "project_kind": "survey",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_column_sentinel_route_and_duplicate_key() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let supervisor = create_user(&db, "sup@acme.example", "supervisor").await?;
    let agent = create_user(&db, "agent@acme.example", "agent").await?;
    let (_, _, _, sheet_id) = build_tree(&server, admin, supervisor, agent).await?;
    let (name, value) = actor_header(admin);

    // The literal "new" sentinel creates
    let response = server
        .post(&format!("/api/v1/sheet/{}/column/new", sheet_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Status",
            "data_key": "status",
            "column_type": "select",
            "options": [
                {"value": "ok", "label": "OK"},
                {"value": "no", "label": "Not OK"},
            ],
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let column: Value = response.json();
    let column_id = column["id"].as_i64().unwrap();
    assert_eq!(column["data_key"], "status");

    // A duplicate data key conflicts
    let response = server
        .post(&format!("/api/v1/sheet/{}/column/new", sheet_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Status Again",
            "data_key": "status",
            "column_type": "text",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "DUPLICATE_DATA_KEY");

    // A numeric id on the same route updates
    let response = server
        .post(&format!("/api/v1/sheet/{}/column/{}", sheet_id, column_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Call Status"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Call Status");

    // PATCH offers the partial form too
    let response = server
        .patch(&format!("/api/v1/sheet/{}/column/{}", sheet_id, column_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"visible_to_user": false}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["visible_to_user"], false);

    // The sheet detail carries the column for the admin
    let response = server
        .get(&format!("/api/v1/sheet/{}", sheet_id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["columns"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_agent_row_scoping_and_masking() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let supervisor = create_user(&db, "sup@acme.example", "supervisor").await?;
    let agent = create_user(&db, "agent@acme.example", "agent").await?;
    let (_, _, _, sheet_id) = build_tree(&server, admin, supervisor, agent).await?;

    let (admin_h, admin_v) = actor_header(admin);
    let (sup_h, sup_v) = actor_header(supervisor);
    let (agent_h, agent_v) = actor_header(agent);

    // Admin defines the schema
    for payload in [
        json!({"name": "Lead Name", "data_key": "lead_name", "column_type": "text", "is_required": true}),
        json!({"name": "Status", "data_key": "status", "column_type": "select",
               "options": [{"value": "ok", "label": "OK"}, {"value": "no", "label": "Not OK"}]}),
        json!({"name": "Phone", "data_key": "phone", "column_type": "phone",
               "editable_by_user": false,
               "phone_numbers": ["994500001123", "994500001124"]}),
    ] {
        let response = server
            .post(&format!("/api/v1/sheet/{}/column/new", sheet_id))
            .add_header(admin_h.clone(), admin_v.clone())
            .json(&payload)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    // Supervisor grants the agent rows 1..=5
    let response = server
        .post(&format!("/api/v1/sheet/{}/grants", sheet_id))
        .add_header(sup_h.clone(), sup_v.clone())
        .json(&json!({"agent_id": agent, "start_row": 1, "end_row": 5}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Supervisor fills nine rows
    for i in 1..=9 {
        let response = server
            .post(&format!("/api/v1/sheet/{}/rows", sheet_id))
            .add_header(sup_h.clone(), sup_v.clone())
            .json(&json!({"lead_name": format!("Lead {}", i), "phone": "994500001123"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    // Agent sees only granted rows, phones masked
    let response = server
        .get(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(agent_h.clone(), agent_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    for row in rows {
        assert_eq!(row["data"]["phone"], "99450******3");
    }

    // Supervisor sees all rows with full numbers
    let response = server
        .get(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(sup_h.clone(), sup_v.clone())
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 9);
    assert_eq!(body["data"][0]["data"]["phone"], "994500001123");

    // Agent patches inside the grant with the {key, value} form
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/3", sheet_id))
        .add_header(agent_h.clone(), agent_v.clone())
        .json(&json!({"key": "status", "value": "ok"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Outside the grant the row reads as absent
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/9", sheet_id))
        .add_header(agent_h.clone(), agent_v.clone())
        .json(&json!({"key": "status", "value": "ok"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Unknown option values are rejected
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/3", sheet_id))
        .add_header(agent_h.clone(), agent_v.clone())
        .json(&json!({"key": "status", "value": "maybe"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_OPTION");

    // Phone cells never accept agent writes
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/3", sheet_id))
        .add_header(agent_h.clone(), agent_v.clone())
        .json(&json!({"key": "phone", "value": "994500001124"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // An unrelated agent cannot see the sheet at all
    let outsider = create_user(&db, "other@acme.example", "agent").await?;
    let (out_h, out_v) = actor_header(outsider);
    let response = server
        .get(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(out_h, out_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_partial_patch_and_delete_row() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let supervisor = create_user(&db, "sup@acme.example", "supervisor").await?;
    let agent = create_user(&db, "agent@acme.example", "agent").await?;
    let (_, _, _, sheet_id) = build_tree(&server, admin, supervisor, agent).await?;
    let (name, value) = actor_header(admin);

    for payload in [
        json!({"name": "Lead Name", "data_key": "lead_name", "column_type": "text", "is_required": true}),
        json!({"name": "Call Date", "data_key": "call_date", "column_type": "date"}),
        json!({"name": "Score", "data_key": "score", "column_type": "number"}),
    ] {
        server
            .post(&format!("/api/v1/sheet/{}/column/new", sheet_id))
            .add_header(name.clone(), value.clone())
            .json(&payload)
            .await;
    }

    let response = server
        .post(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"lead_name": "Ada", "score": "41"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let row: Value = response.json();
    assert_eq!(row["row_number"], 1);
    // Numeric strings coerce on write
    assert_eq!(row["data"]["score"], 41);

    // Partial map patch touches several cells at once
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/1", sheet_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"score": 42, "call_date": "28/02/2026"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let row: Value = response.json();
    assert_eq!(row["data"]["score"], 42);
    // Dates present in display form
    assert_eq!(row["data"]["call_date"], "28 Feb 2026");

    // Missing rows are 404
    let response = server
        .patch(&format!("/api/v1/sheet/{}/rows/7", sheet_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"score": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Delete
    let response = server
        .delete(&format!("/api/v1/sheet/{}/rows/1", sheet_id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(name, value)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_supervisor_scope_is_per_project() -> Result<()> {
    let (server, db, _temp_file) = setup_test_server().await?;
    let admin = create_user(&db, "admin@acme.example", "admin").await?;
    let supervisor = create_user(&db, "sup@acme.example", "supervisor").await?;
    let other_supervisor = create_user(&db, "sup2@acme.example", "supervisor").await?;
    let agent = create_user(&db, "agent@acme.example", "agent").await?;
    let (_, _, _, sheet_id) = build_tree(&server, admin, supervisor, agent).await?;

    // The assigned supervisor can manage grants
    let (sup_h, sup_v) = actor_header(supervisor);
    let response = server
        .post(&format!("/api/v1/sheet/{}/grants", sheet_id))
        .add_header(sup_h, sup_v)
        .json(&json!({"agent_id": agent, "start_row": 1, "end_row": 3}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // A supervisor of a different project gets 404 shape, not 403
    let (other_h, other_v) = actor_header(other_supervisor);
    let response = server
        .post(&format!("/api/v1/sheet/{}/grants", sheet_id))
        .add_header(other_h.clone(), other_v.clone())
        .json(&json!({"agent_id": agent, "start_row": 1, "end_row": 3}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .get(&format!("/api/v1/sheet/{}/rows", sheet_id))
        .add_header(other_h, other_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}
