//! Unified error handling with Sentry integration.
//!
//! All admin route handlers return `Result<T, AppError>`; server-class
//! errors are captured to Sentry before the response is built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::AdminApiError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] AdminApiError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Session(_)
                | Self::Api(
                    AdminApiError::Http(_) | AdminApiError::Parse(_) | AdminApiError::Backend { .. }
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(err) => match err {
                AdminApiError::NotFound(_) => StatusCode::NOT_FOUND,
                AdminApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                AdminApiError::Rejected(_) => StatusCode::BAD_REQUEST,
                AdminApiError::Http(_) | AdminApiError::Parse(_) | AdminApiError::Backend { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Api(err) => match err {
                AdminApiError::NotFound(_) => "Not found".to_string(),
                AdminApiError::Unauthorized(_) => "Session expired, please log in again".to_string(),
                AdminApiError::Rejected(message) => message.clone(),
                AdminApiError::Http(_) | AdminApiError::Parse(_) | AdminApiError::Backend { .. } => {
                    "External service error".to_string()
                }
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = AppError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Api(AdminApiError::Unauthorized("t".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
