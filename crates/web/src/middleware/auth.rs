//! Session authenticator: extractors and login/logout helpers.
//!
//! An admin is authenticated exactly when the session holds a
//! [`CurrentAdmin`] under [`session_keys::CURRENT_ADMIN`].

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};

/// Where anonymous requests to protected pages are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires admin authentication.
///
/// Anonymous requests are redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection for [`RequireAdminAuth`].
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Not logged in.
    RedirectToLogin,
    /// The session layer is missing from the router.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        let admin = current_admin(session)
            .await
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject anonymous requests.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(admin))
    }
}

/// The admin bound to this session, if any.
///
/// A session entry that fails to deserialize counts as anonymous.
pub async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

/// Bind an authenticated admin to the session.
///
/// The session id is cycled first so a token issued before login cannot be
/// reused afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn log_in(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await?;
    set_sentry_user(&admin.id, admin.username.as_str());
    Ok(())
}

/// Destroy the session: the stored record is deleted and the cookie cleared.
///
/// Calling this on an anonymous session is a no-op.
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await?;
    clear_sentry_user();
    Ok(())
}
