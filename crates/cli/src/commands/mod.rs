//! Subcommand implementations.

pub mod admin;
pub mod migrate;

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use wfa_web::config::{ConfigError, ProvisioningConfig};
use wfa_web::db::{self, PgAdminStore};
use wfa_web::services::AuthService;
use wfa_web::services::auth::AuthError;
use wfa_web::services::bootstrap::BootstrapError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("invalid username: {0}")]
    InvalidUsername(#[from] wfa_core::UsernameError),
}

/// Load provisioning settings and connect.
async fn connect() -> Result<(ProvisioningConfig, PgPool), CliError> {
    let config = ProvisioningConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok((config, pool))
}

fn auth_service(pool: &PgPool) -> AuthService {
    AuthService::new(Arc::new(PgAdminStore::new(pool.clone())))
}
