use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::projects;
use crate::errors::PermissionError;
use crate::permissions::{Actor, Role};
use crate::server::actor::CurrentActor;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::services::schema_service::{ProjectDraft, ProjectPatch};

use super::require_admin;

/// Visibility at project granularity: supervisors see supervised projects,
/// agents see projects they are assigned to, partners are read-only viewers.
fn project_visible(actor: &Actor, project: &projects::Model) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => project.has_supervisor(actor.user_id),
        Role::Agent => project.agent_id_set().contains(&actor.user_id),
        Role::Partner => true,
    }
}

pub async fn create_project(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<ProjectDraft>,
) -> ApiResult<Json<projects::Model>> {
    require_admin(&actor)?;
    let project = state.schema.create_project(payload).await?;
    Ok(Json(project))
}

pub async fn list_projects(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> ApiResult<Json<Vec<projects::Model>>> {
    let projects = state.schema.list_projects().await?;
    Ok(Json(
        projects
            .into_iter()
            .filter(|p| project_visible(&actor, p))
            .collect(),
    ))
}

pub async fn get_project(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<projects::Model>> {
    let project = state.schema.get_project(id).await?;
    if !project_visible(&actor, &project) {
        return Err(PermissionError::Forbidden.into());
    }
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
    Json(payload): Json<ProjectPatch>,
) -> ApiResult<Json<projects::Model>> {
    require_admin(&actor)?;
    let project = state.schema.update_project(id, payload).await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    require_admin(&actor)?;
    state.schema.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
