pub mod columns;
pub mod companies;
pub mod grants;
pub mod health;
pub mod projects;
pub mod rows;
pub mod sheets;
pub mod workbooks;

use crate::errors::PermissionError;
use crate::permissions::{Actor, Role};

use super::error::ApiError;

/// Admin-only operations answer 404-shaped for everyone else.
pub(crate) fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(PermissionError::Forbidden.into())
    }
}
