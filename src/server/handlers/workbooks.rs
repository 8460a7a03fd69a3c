use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::{projects, workbooks};
use crate::errors::PermissionError;
use crate::permissions::{Actor, Role};
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::services::schema_service::{WorkbookDraft, WorkbookPatch};

use super::require_admin;

fn workbook_visible(actor: &Actor, project: &projects::Model, workbook: &workbooks::Model) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => project.has_supervisor(actor.user_id),
        Role::Agent => {
            workbook.agent_id_set().contains(&actor.user_id)
                || project.agent_id_set().contains(&actor.user_id)
        }
        Role::Partner => true,
    }
}

pub async fn create_workbook(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(project_id): Path<i32>,
    Json(payload): Json<WorkbookDraft>,
) -> ApiResult<Json<workbooks::Model>> {
    require_admin(&actor)?;
    let workbook = state.schema.create_workbook(project_id, payload).await?;
    Ok(Json(workbook))
}

pub async fn list_workbooks(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(project_id): Path<i32>,
) -> ApiResult<Json<Vec<workbooks::Model>>> {
    let project = state.schema.get_project(project_id).await?;
    let workbooks = state.schema.list_workbooks(project_id).await?;
    Ok(Json(
        workbooks
            .into_iter()
            .filter(|w| workbook_visible(&actor, &project, w))
            .collect(),
    ))
}

pub async fn get_workbook(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<workbooks::Model>> {
    let workbook = state.schema.get_workbook(id).await?;
    let project = state.schema.get_project(workbook.project_id).await?;
    if !workbook_visible(&actor, &project, &workbook) {
        return Err(PermissionError::Forbidden.into());
    }
    Ok(Json(workbook))
}

pub async fn update_workbook(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
    Json(payload): Json<WorkbookPatch>,
) -> ApiResult<Json<workbooks::Model>> {
    require_admin(&actor)?;
    let workbook = state.schema.update_workbook(id, payload).await?;
    Ok(Json(workbook))
}

pub async fn delete_workbook(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    require_admin(&actor)?;
    state.schema.delete_workbook(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
