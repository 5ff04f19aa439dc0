//! API error mapping.
//!
//! Deterministic caller mistakes (validation, not-found, duplicates) map to
//! 4xx responses with a message; storage and aggregation failures map to a
//! generic 500 that never leaks internal diagnostic detail. Publish failures
//! never reach this layer at all.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use techfolio_core::errors::{DatabaseError, Error, ValidationError};

/// Result alias for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper turning core errors into HTTP responses.
pub struct ApiError(Error);

impl ApiError {
    /// 404 for a resource that does not exist.
    pub fn not_found(what: &str) -> Self {
        ApiError(Error::Database(DatabaseError::NotFound(what.to_string())))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation(ValidationError::DuplicateName(_)) => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            Error::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            Error::Database(DatabaseError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Error::Database(DatabaseError::UniqueViolation(_)) => {
                (StatusCode::CONFLICT, "Conflicting resource".to_string())
            }
            _ => {
                tracing::error!("Internal error serving request: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
