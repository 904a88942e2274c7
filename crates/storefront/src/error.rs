//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Turning an error into a
//! response does three things at once: captures server-class errors to
//! Sentry, picks the status code, and swaps the internal message for a
//! client-safe one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and client-safe message for this error.
    ///
    /// Internal and upstream failures never leak their detail to the client;
    /// the full error still reaches the logs and Sentry.
    fn response_parts(&self) -> (StatusCode, String) {
        match self {
            Self::Api(err) => match err {
                ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".into()),
                ApiError::Unauthorized(_) => (
                    StatusCode::UNAUTHORIZED,
                    "Please log in and try again".into(),
                ),
                ApiError::Rejected(message) => (StatusCode::BAD_REQUEST, message.clone()),
                ApiError::Http(_) | ApiError::Parse(_) | ApiError::Backend { .. } => {
                    (StatusCode::BAD_GATEWAY, "External service error".into())
                }
            },
            Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Session(_)
                | Self::Api(ApiError::Http(_) | ApiError::Parse(_) | ApiError::Backend { .. })
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

        self.response_parts().into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_errors_map_to_upstream_statuses() {
        assert_eq!(
            get_status(AppError::Api(ApiError::NotFound("p".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::Unauthorized("t".to_string()))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::Backend {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_detail_never_reaches_client() {
        let (_, message) = AppError::Internal("connection string".to_string()).response_parts();
        assert_eq!(message, "Internal server error");
    }
}
