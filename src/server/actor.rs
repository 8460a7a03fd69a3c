//! Actor resolution
//!
//! Session issuance lives outside this engine; the boundary contract is an
//! `x-actor-id` header naming an active user. The resolved actor is passed
//! explicitly into the permission resolver on every call.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::database::entities::users;
use crate::permissions::Actor;

use super::app::AppState;
use super::error::ApiError;

pub const ACTOR_HEADER: &str = "x-actor-id";

pub struct CurrentActor(pub Actor);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(ApiError::unauthorized)?;

        let user_id: i32 = raw.trim().parse().map_err(|_| ApiError::unauthorized())?;

        let user = users::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        if !user.is_active {
            return Err(ApiError::unauthorized());
        }

        let role = user.parsed_role().ok_or_else(ApiError::unauthorized)?;
        Ok(CurrentActor(Actor::new(user.id, role)))
    }
}
