//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server-side failures are captured
//! to Sentry before a generic response is sent; internal details never reach
//! the client.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::middleware::auth::LOGIN_PATH;
use crate::services::{AuthError, CatalogError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not logged in.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 404 page.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

impl AppError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Catalog(CatalogError::NotFound))
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Catalog(CatalogError::Repository(_) | CatalogError::Image(_))
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
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

        if matches!(self, Self::Unauthorized) {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        if self.is_not_found() {
            return (StatusCode::NOT_FOUND, NotFoundTemplate).into_response();
        }

        let status = match &self {
            Self::BadRequest(_) | Self::Catalog(CatalogError::InvalidCategory(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::DuplicateUsername) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Catalog(CatalogError::InvalidCategory(_)) => "Unknown category".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid login details".to_string(),
            Self::Auth(AuthError::DuplicateUsername) => "Username already exists".to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with the logged-in admin.
pub fn set_sentry_user(admin_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context (on logout).
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status(AppError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AppError::Catalog(CatalogError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(AppError::Unauthorized), StatusCode::SEE_OTHER);
        assert_eq!(
            status(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let err = AppError::Internal("connection string leaked".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        assert_eq!(&body[..], b"Internal server error");
    }
}
