use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::services::{Op, OpOutcome, RowQuery};

pub async fn list_rows(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    Query(query): Query<RowQuery>,
) -> ApiResult<Json<Value>> {
    let page = state.gateway.get(&actor, sheet_id, query).await?;
    Ok(Json(json!({ "data": page.rows })))
}

pub async fn create_row(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    Json(data): Json<Map<String, Value>>,
) -> ApiResult<Json<OpOutcome>> {
    let outcome = state
        .gateway
        .apply(&actor, sheet_id, Op::CreateRow { data })
        .await?;
    Ok(Json(outcome))
}

/// Exact `{key, value}` bodies patch a single cell; any other object body
/// is a partial data map merged into the row.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum PatchRowRequest {
    Cell(CellPatch),
    Partial(Map<String, Value>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellPatch {
    pub key: String,
    pub value: Value,
}

pub async fn patch_row(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, row_number)): Path<(i32, i64)>,
    Json(payload): Json<PatchRowRequest>,
) -> ApiResult<Json<OpOutcome>> {
    let op = match payload {
        PatchRowRequest::Cell(cell) => Op::PatchCell {
            row_number,
            key: cell.key,
            value: cell.value,
        },
        PatchRowRequest::Partial(data) => Op::PatchRow { row_number, data },
    };

    let outcome = state.gateway.apply(&actor, sheet_id, op).await?;
    Ok(Json(outcome))
}

pub async fn delete_row(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((sheet_id, row_number)): Path<(i32, i64)>,
) -> ApiResult<StatusCode> {
    state
        .gateway
        .apply(&actor, sheet_id, Op::DeleteRow { row_number })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Multipart CSV upload. The first file field is taken as the import file.
pub async fn import_rows(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(sheet_id): Path<i32>,
    mut multipart: Multipart,
) -> ApiResult<Json<OpOutcome>> {
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {}", e)))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if is_file {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;
            bytes = Some(data.to_vec());
            break;
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::bad_request("no file field in upload"))?;
    let outcome = state
        .gateway
        .apply(&actor, sheet_id, Op::ImportRows { bytes })
        .await?;
    Ok(Json(outcome))
}
