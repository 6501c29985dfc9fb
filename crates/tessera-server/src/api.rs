//! HTTP error surface for the tenant administration routes.
//!
//! Every failure renders as a JSON `{"error": "..."}` body with a status
//! that preserves the distinction between caller mistakes (400/404/409)
//! and backend trouble (500). Infrastructure detail is logged, never
//! leaked into the body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tessera_cache::CacheError;
use tessera_core::CoreError;
use tessera_storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed tenant does not exist.
    #[error("tenant not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("{field} already in use")]
    Conflict { field: String },

    /// Store of record or cache failure. The detail stays in the logs.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Self::NotFound,
            StorageError::Conflict { field, .. } => Self::Conflict { field },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTenantName(msg) => Self::BadRequest(msg),
            CoreError::InvalidId(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_expected_statuses() {
        assert_eq!(
            ApiError::from(StorageError::not_found("abc")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StorageError::conflict("name", "acme")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StorageError::connection("pool exhausted")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = ApiError::from(CoreError::InvalidTenantName("too short".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "too short");
    }

    #[test]
    fn internal_detail_is_not_in_display() {
        let err = ApiError::Internal("connection refused at 10.0.0.3".into());
        assert_eq!(err.to_string(), "internal error");
    }
}
