use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::services::{MutationGateway, SchemaService, SheetLocks};

use super::handlers::{columns, companies, grants, health, projects, rows, sheets, workbooks};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub schema: SchemaService,
    pub gateway: MutationGateway,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let locks = SheetLocks::new();
    let state = AppState {
        schema: SchemaService::new(db.clone()),
        gateway: MutationGateway::new(db.clone(), locks),
        db,
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Company routes
        .route("/companies", get(companies::list_companies))
        .route("/companies", post(companies::create_company))
        .route("/companies/:id", get(companies::get_company))
        // Project routes
        .route("/projects", get(projects::list_projects))
        .route("/projects", post(projects::create_project))
        .route("/projects/:id", get(projects::get_project))
        .route("/projects/:id", put(projects::update_project))
        .route("/projects/:id", delete(projects::delete_project))
        // Workbook routes
        .route("/projects/:id/workbooks", get(workbooks::list_workbooks))
        .route("/projects/:id/workbooks", post(workbooks::create_workbook))
        .route("/workbooks/:id", get(workbooks::get_workbook))
        .route("/workbooks/:id", put(workbooks::update_workbook))
        .route("/workbooks/:id", delete(workbooks::delete_workbook))
        // Sheet routes
        .route("/workbooks/:id/sheets", get(sheets::list_sheets))
        .route("/workbooks/:id/sheets", post(sheets::create_sheet))
        .route("/sheet/:sheet_id", get(sheets::get_sheet))
        .route("/sheet/:sheet_id", put(sheets::update_sheet))
        .route("/sheet/:sheet_id", delete(sheets::delete_sheet))
        // Column routes ("new" as the column id creates)
        .route("/sheet/:sheet_id/column/:column_id", post(columns::upsert_column))
        .route("/sheet/:sheet_id/column/:column_id", patch(columns::patch_column))
        .route("/sheet/:sheet_id/column/:column_id", delete(columns::delete_column))
        .route("/sheet/:sheet_id/columns/reorder", post(columns::reorder_columns))
        // Row grant routes
        .route("/sheet/:sheet_id/grants", get(grants::list_grants))
        .route("/sheet/:sheet_id/grants", post(grants::create_grant))
        .route("/sheet/:sheet_id/grants/:grant_id", delete(grants::delete_grant))
        // Row routes
        .route("/sheet/:sheet_id/rows", get(rows::list_rows))
        .route("/sheet/:sheet_id/rows", post(rows::create_row))
        .route("/sheet/:sheet_id/rows/import", post(rows::import_rows))
        .route("/sheet/:sheet_id/rows/:row_number", patch(rows::patch_row))
        .route("/sheet/:sheet_id/rows/:row_number", delete(rows::delete_row))
}
