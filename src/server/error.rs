//! HTTP mapping for domain errors
//!
//! All handlers return `ApiResult<T>`; every domain error converts into an
//! `ApiError` carrying the status and a stable error code. Permission
//! failures arrive here already collapsed to a 404 shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use crate::errors::{GatewayError, ImportError, PermissionError, RowError, SchemaError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "UNAUTHENTICATED", "Missing or unknown actor")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "BAD_REQUEST", message)
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {} ({})", self.message, self.code);
        }

        let mut body = json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(details) = self.details {
            if let (Some(map), Some(extra)) = (body.as_object_mut(), details.as_object()) {
                for (k, v) in extra {
                    map.insert(k.clone(), v.clone());
                }
            }
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::new(err.http_status(), err.error_code(), err.to_string())
    }
}

impl From<RowError> for ApiError {
    fn from(err: RowError) -> Self {
        ApiError::new(err.http_status(), err.error_code(), err.to_string())
    }
}

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        ApiError::new(err.http_status(), err.error_code(), err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let base = ApiError::new(err.http_status(), err.error_code(), err.to_string());
        match err {
            ImportError::Validation {
                row,
                data_key,
                reason,
            } => base.with_details(json!({
                "row": row,
                "data_key": data_key,
                "reason": reason,
            })),
            _ => base,
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Schema(e) => e.into(),
            GatewayError::Row(e) => e.into(),
            GatewayError::Permission(e) => e.into(),
            GatewayError::Import(e) => e.into(),
            GatewayError::Database(e) => e.into(),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        error!("Database error: {}", err);
        ApiError::new(500, "DATABASE_ERROR", "Internal server error")
    }
}
