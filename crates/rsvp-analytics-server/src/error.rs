//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rsvp_analytics::AnalyticsError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::source::SourceError;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Data source error: {0}")]
    Source(SourceError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::EventNotFound(id) => ApiError::EventNotFound(id.to_string()),
            other => ApiError::Source(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Source(_) | ApiError::Io(_)) {
            error!("Request failed: {}", self);
        }

        let suggestions = match &self {
            ApiError::Analytics(e) => e.suggestions(),
            _ => Vec::new(),
        };

        let (status, error_message) = match self {
            ApiError::EventNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Analytics(ref e) => (StatusCode::BAD_REQUEST, e.user_message()),
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            ApiError::Source(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Data source error".to_string(),
            ),
            ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if !suggestions.is_empty() {
            body["suggestions"] = json!(suggestions);
        }

        (status, Json(body)).into_response()
    }
}

// Convenience functions for common errors
impl ApiError {
    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }

    pub fn config(msg: &str) -> Self {
        Self::Config(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        let id = Uuid::nil();
        let not_found: ApiError = SourceError::EventNotFound(id).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let bad_lookback = ApiError::from(AnalyticsError::InvalidLookback {
            requested: 0,
            max: 731,
        });
        assert_eq!(bad_lookback.into_response().status(), StatusCode::BAD_REQUEST);

        let backend: ApiError = SourceError::Backend("down".into()).into();
        assert_eq!(
            backend.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
