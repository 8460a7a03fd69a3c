use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;

use crate::database::entities::companies;
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

use super::require_admin;

#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub domain: String,
}

pub async fn create_company(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<Json<companies::Model>> {
    require_admin(&actor)?;
    let company = state.schema.create_company(payload.name, payload.domain).await?;
    Ok(Json(company))
}

pub async fn list_companies(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> ApiResult<Json<Vec<companies::Model>>> {
    require_admin(&actor)?;
    Ok(Json(state.schema.list_companies().await?))
}

pub async fn get_company(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<companies::Model>> {
    require_admin(&actor)?;
    Ok(Json(state.schema.get_company(id).await?))
}
