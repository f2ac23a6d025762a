//! Error types for the user cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::users::StoreError;

// == Cache Error Enum ==
/// Unified error type for the cache and lookup layers.
///
/// A missing user is not an error for the lookup layer itself; `NotFound` only
/// exists so HTTP handlers can turn an absent result into a 404.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Lookup attempted before a document store was installed
    #[error("User lookup is not configured: no document store installed")]
    NotConfigured,

    /// A document store was installed twice
    #[error("User lookup is already configured")]
    AlreadyConfigured,

    /// The backing document store failed; passed through unchanged
    #[error("Document store error: {0}")]
    Upstream(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotConfigured | CacheError::AlreadyConfigured => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CacheError::Upstream(StoreError::Unavailable(_) | StoreError::Timeout) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::Upstream(StoreError::Query(_)) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::NotFound("user 1".into()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotConfigured, StatusCode::INTERNAL_SERVER_ERROR),
            (
                CacheError::Upstream(StoreError::Timeout),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CacheError::Upstream(StoreError::Query("bad filter".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_error_converts() {
        let err: CacheError = StoreError::Unavailable("connection reset".into()).into();
        assert!(matches!(err, CacheError::Upstream(StoreError::Unavailable(_))));
        assert!(err.to_string().contains("connection reset"));
    }
}
