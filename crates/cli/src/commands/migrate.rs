//! Schema migration and provisioning commands.
//!
//! # Usage
//!
//! ```bash
//! wfa-cli migrate
//! wfa-cli init-db
//! ```
//!
//! # Environment Variables
//!
//! - `WFA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `WFA_DEFAULT_PASS` - Password for the default admin (init-db only)
//!
//! # Migration Files
//!
//! Catalog migrations: `crates/web/migrations/`. The session table is
//! created by the session store itself.

use secrecy::ExposeSecret;

use wfa_web::config::ProvisioningConfig;
use wfa_web::services::bootstrap::{
    DEFAULT_ADMIN_USERNAME, ProvisionOutcome, ensure_default_admin, ensure_schema,
};

use super::{CliError, auth_service, connect};

/// Apply all migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running migrations...");
    ensure_schema(&pool).await?;
    tracing::info!("Migrations complete!");

    Ok(())
}

/// Apply migrations and provision `wfa_admin` if it does not exist.
///
/// Safe to run repeatedly; an existing admin is never modified.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or provisioning fails.
pub async fn init_db() -> Result<(), CliError> {
    let (config, pool) = connect().await?;

    tracing::info!("Running migrations...");
    ensure_schema(&pool).await?;

    let auth = auth_service(&pool);
    match ensure_default_admin(&auth, &config.default_admin_password).await? {
        ProvisionOutcome::Created(identity) => {
            tracing::info!(admin_id = %identity.id, "Default admin created");
            report_credentials(&config);
        }
        ProvisionOutcome::AlreadyExists => {
            tracing::info!(
                username = DEFAULT_ADMIN_USERNAME,
                "Default admin already exists, leaving it unchanged"
            );
        }
    }

    Ok(())
}

/// Tell the operator how to log in, once, right after creation.
#[allow(clippy::print_stdout)]
fn report_credentials(config: &ProvisioningConfig) {
    if config.password_from_env {
        println!("Created default admin: {DEFAULT_ADMIN_USERNAME} (password from WFA_DEFAULT_PASS)");
    } else {
        println!(
            "Created default admin: {DEFAULT_ADMIN_USERNAME} / {}",
            config.default_admin_password.expose_secret()
        );
        println!("Change this password: wfa-cli admin set-password -u {DEFAULT_ADMIN_USERNAME}");
    }
}
