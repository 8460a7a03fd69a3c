use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::row_grants;
use crate::errors::PermissionError;
use crate::permissions::can_manage_schema;
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::services::schema_service::GrantDraft;

/// Row grants are supervisor/admin tooling; everyone else gets 404 shape.
async fn require_grant_rights(
    state: &AppState,
    actor: &crate::permissions::Actor,
    sheet_id: i32,
) -> ApiResult<()> {
    let scope = state.schema.load_sheet_scope(sheet_id).await?;
    if !can_manage_schema(actor, &scope.context()) {
        return Err(PermissionError::Forbidden.into());
    }
    Ok(())
}

pub async fn list_grants(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
) -> ApiResult<Json<Vec<row_grants::Model>>> {
    require_grant_rights(&state, &actor, sheet_id).await?;
    Ok(Json(state.schema.list_grants(sheet_id).await?))
}

pub async fn create_grant(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    Json(payload): Json<GrantDraft>,
) -> ApiResult<Json<row_grants::Model>> {
    require_grant_rights(&state, &actor, sheet_id).await?;
    Ok(Json(state.schema.create_grant(sheet_id, payload).await?))
}

pub async fn delete_grant(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, grant_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    require_grant_rights(&state, &actor, sheet_id).await?;
    state.schema.delete_grant(sheet_id, grant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
