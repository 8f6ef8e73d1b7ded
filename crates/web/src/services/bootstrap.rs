//! One-shot provisioning: schema setup and the default admin identity.
//!
//! Run by `wfa-cli init-db`, never by the web server. Both steps are
//! idempotent and safe to repeat.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use wfa_core::Username;

use super::auth::{AuthError, AuthService};
use crate::models::AdminIdentity;

/// Login name of the provisioned admin.
pub const DEFAULT_ADMIN_USERNAME: &str = "wfa_admin";

/// Errors from schema setup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("catalog migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("session table setup failed: {0}")]
    SessionStore(#[from] sqlx::Error),

    #[error("admin provisioning failed: {0}")]
    Auth(#[from] AuthError),
}

/// Result of [`ensure_default_admin`].
#[derive(Debug)]
pub enum ProvisionOutcome {
    /// The admin did not exist and was created.
    Created(AdminIdentity),
    /// An admin with the default username already existed; nothing changed.
    AlreadyExists,
}

/// Create the catalog tables and the session table if missing.
///
/// # Errors
///
/// Returns `BootstrapError` if a migration fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), BootstrapError> {
    crate::db::run_migrations(pool).await?;
    PostgresStore::new(pool.clone()).migrate().await?;
    Ok(())
}

/// Create `wfa_admin` with `password` unless it already exists.
///
/// An existing identity is never modified. Losing a creation race to another
/// provisioning run counts as already provisioned.
///
/// # Errors
///
/// Returns `AuthError` if the lookup or insert fails for any other reason.
pub async fn ensure_default_admin(
    auth: &AuthService,
    password: &SecretString,
) -> Result<ProvisionOutcome, AuthError> {
    let username = default_username();

    if auth.find(&username).await?.is_some() {
        return Ok(ProvisionOutcome::AlreadyExists);
    }

    match auth
        .create_admin(&username, password.expose_secret())
        .await
    {
        Ok(identity) => Ok(ProvisionOutcome::Created(identity)),
        Err(AuthError::DuplicateUsername) => Ok(ProvisionOutcome::AlreadyExists),
        Err(e) => Err(e),
    }
}

#[allow(clippy::expect_used)]
fn default_username() -> Username {
    Username::parse(DEFAULT_ADMIN_USERNAME).expect("default admin username is valid")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::memory::MemoryAdminStore;

    #[tokio::test]
    async fn test_default_admin_is_created_once() {
        let auth = AuthService::new(Arc::new(MemoryAdminStore::new()));
        let password = SecretString::from("WFA#Garage2025");

        let first = ensure_default_admin(&auth, &password).await.unwrap();
        assert!(matches!(first, ProvisionOutcome::Created(ref a) if a.username.as_str() == "wfa_admin"));

        let other = SecretString::from("something-else");
        let second = ensure_default_admin(&auth, &other).await.unwrap();
        assert!(matches!(second, ProvisionOutcome::AlreadyExists));

        // The original password is untouched.
        auth.authenticate("wfa_admin", "WFA#Garage2025").await.unwrap();
        assert!(auth.authenticate("wfa_admin", "wrong").await.is_err());
    }
}
