//! Admin identity management commands.
//!
//! # Usage
//!
//! ```bash
//! wfa-cli admin create -u alice --password 's3cret'
//! WFA_ADMIN_PASSWORD='n3w' wfa-cli admin set-password -u alice
//! ```
//!
//! # Environment Variables
//!
//! - `WFA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `WFA_ADMIN_PASSWORD` - Password, when `--password` is not given

use secrecy::{ExposeSecret, SecretString};

use wfa_core::{AdminId, Username};

use super::{CliError, auth_service, connect};

/// Create a new admin.
///
/// # Errors
///
/// Returns `CliError::Auth(AuthError::DuplicateUsername)` if the username is
/// taken.
pub async fn create(username: &str, password: &SecretString) -> Result<AdminId, CliError> {
    let username = Username::parse(username)?;
    let (_, pool) = connect().await?;

    tracing::info!("Creating admin: {}", username);
    let identity = auth_service(&pool)
        .create_admin(&username, password.expose_secret())
        .await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Username: {}",
        identity.id,
        identity.username
    );

    Ok(identity.id)
}

/// Replace an admin's password.
///
/// # Errors
///
/// Returns `CliError::Auth(AuthError::AdminNotFound)` if no admin has this
/// username.
pub async fn set_password(username: &str, password: &SecretString) -> Result<(), CliError> {
    let username = Username::parse(username)?;
    let (_, pool) = connect().await?;

    auth_service(&pool)
        .set_password(&username, password.expose_secret())
        .await?;

    tracing::info!("Password updated for admin: {}", username);
    Ok(())
}
