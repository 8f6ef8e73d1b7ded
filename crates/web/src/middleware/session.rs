//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` (`tower_sessions.session`, created by
//! `wfa-cli init-db`) and are addressed by a signed cookie.

use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "wfa_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over any session store.
///
/// # Arguments
///
/// * `store` - Session store (`PostgresStore` in production)
/// * `key` - Cookie signing key derived from `WFA_SESSION_SECRET`
/// * `secure` - Mark the cookie `Secure` (HTTPS deployments)
#[must_use]
pub fn create_session_layer<S>(
    store: S,
    key: Key,
    secure: bool,
) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
