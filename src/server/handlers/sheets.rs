use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::sheets;
use crate::errors::PermissionError;
use crate::permissions::{can_manage_schema, can_view_sheet};
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::services::gateway::SheetDetail;
use crate::services::schema_service::{SheetDraft, SheetPatch};

use super::require_admin;

pub async fn create_sheet(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(workbook_id): Path<i32>,
    Json(payload): Json<SheetDraft>,
) -> ApiResult<Json<sheets::Model>> {
    require_admin(&actor)?;
    let sheet = state.schema.create_sheet(workbook_id, payload).await?;
    Ok(Json(sheet))
}

pub async fn list_sheets(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(workbook_id): Path<i32>,
) -> ApiResult<Json<Vec<sheets::Model>>> {
    let sheets = state.schema.list_sheets(workbook_id).await?;

    let mut visible = Vec::new();
    for sheet in sheets {
        let scope = state.schema.load_sheet_scope(sheet.id).await?;
        if can_view_sheet(&actor, &scope.context()) {
            visible.push(sheet);
        }
    }
    Ok(Json(visible))
}

/// The sheet with its live columns, filtered to what the actor may see.
pub async fn get_sheet(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
) -> ApiResult<Json<SheetDetail>> {
    let detail = state.gateway.describe(&actor, sheet_id).await?;
    Ok(Json(detail))
}

pub async fn update_sheet(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    Json(payload): Json<SheetPatch>,
) -> ApiResult<Json<sheets::Model>> {
    let scope = state.schema.load_sheet_scope(sheet_id).await?;
    if !can_manage_schema(&actor, &scope.context()) {
        return Err(PermissionError::Forbidden.into());
    }
    let sheet = state.schema.update_sheet(sheet_id, payload).await?;
    Ok(Json(sheet))
}

pub async fn delete_sheet(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
) -> ApiResult<StatusCode> {
    require_admin(&actor)?;
    state.schema.delete_sheet(sheet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
