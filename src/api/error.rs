use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::GriddyError;

/// JSON error body `{"error": message}` with a status code
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a service error onto the route's taxonomy.
    ///
    /// Validation failures become 400 and missing credentials are named;
    /// every other failure collapses into `fallback` with status 500.
    pub fn from_error(err: &GriddyError, fallback: &str) -> Self {
        match err {
            GriddyError::Validation { message } => Self::bad_request(message.clone()),
            GriddyError::MissingKey { .. } => Self::internal(err.to_string()),
            _ => Self::internal(fallback),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_bad_request() {
        let err = ApiError::from_error(&GriddyError::validation("Missing prompt"), "Agent failed");
        assert_eq!(err, ApiError::bad_request("Missing prompt"));
    }

    #[test]
    fn test_missing_key_is_named() {
        let err = ApiError::from_error(
            &GriddyError::missing_key("Google Maps API key"),
            "Agent failed",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Missing Google Maps API key");
    }

    #[test]
    fn test_upstream_collapses_to_fallback() {
        let err = ApiError::from_error(
            &GriddyError::upstream("geocoder", "connection reset"),
            "Agent failed",
        );
        assert_eq!(err, ApiError::internal("Agent failed"));
    }
}
