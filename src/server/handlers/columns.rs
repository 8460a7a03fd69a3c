use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::PermissionError;
use crate::permissions::can_manage_schema;
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::services::{Op, OpOutcome};

/// Create-or-update through one route: the literal column id `"new"`
/// signals creation, a numeric id updates that column. This mirrors the
/// deployed contract.
pub async fn upsert_column(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, column_id)): Path<(i32, String)>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<OpOutcome>> {
    let op = if column_id == "new" {
        let draft = serde_json::from_value(payload)
            .map_err(|e| ApiError::bad_request(format!("invalid column definition: {}", e)))?;
        Op::CreateColumn { draft }
    } else {
        let column_id: i32 = column_id
            .parse()
            .map_err(|_| ApiError::bad_request(format!("invalid column id '{}'", column_id)))?;
        let patch = serde_json::from_value(payload)
            .map_err(|e| ApiError::bad_request(format!("invalid column definition: {}", e)))?;
        Op::UpdateColumn { column_id, patch }
    };

    let outcome = state.gateway.apply(&actor, sheet_id, op).await?;
    Ok(Json(outcome))
}

pub async fn patch_column(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, column_id)): Path<(i32, i32)>,
    Json(patch): Json<crate::services::schema_service::ColumnPatch>,
) -> ApiResult<Json<OpOutcome>> {
    let outcome = state
        .gateway
        .apply(&actor, sheet_id, Op::UpdateColumn { column_id, patch })
        .await?;
    Ok(Json(outcome))
}

pub async fn delete_column(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, column_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let scope = state.schema.load_sheet_scope(sheet_id).await?;
    if !can_manage_schema(&actor, &scope.context()) {
        return Err(PermissionError::Forbidden.into());
    }
    state.schema.delete_column(sheet_id, column_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<i32>,
}

pub async fn reorder_columns(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    Json(payload): Json<ReorderRequest>,
) -> ApiResult<Json<OpOutcome>> {
    let outcome = state
        .gateway
        .apply(
            &actor,
            sheet_id,
            Op::ReorderColumns {
                ordered_ids: payload.ordered_ids,
            },
        )
        .await?;
    Ok(Json(outcome))
}
