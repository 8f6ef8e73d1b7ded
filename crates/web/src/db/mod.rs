//! Persistence for admin identities and catalog products.
//!
//! # Database schema: `catalog`
//!
//! ## Tables
//!
//! - `catalog.admin_user` - Admin identities with Argon2 password hashes
//! - `catalog.product` - Catalog entries
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/web/migrations/` and are embedded in the binary.
//! They are run by the provisioning command, never on server startup:
//! ```bash
//! cargo run -p wfa-cli -- init-db
//! ```
//!
//! Handlers and services only see the [`AdminStore`] and [`ProductStore`]
//! traits. `PostgreSQL` implementations live in [`admins`] and [`products`];
//! [`memory`] provides in-process implementations for tests.

pub mod admins;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use wfa_core::{AdminId, Category, ProductId, StoredImageName, Username};

use crate::models::{AdminIdentity, Product, ProductDraft};

pub use admins::PgAdminStore;
pub use products::PgProductStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for administrator identities.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Look up an identity by login name.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminIdentity>, RepositoryError>;

    /// Insert a new identity.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<AdminIdentity, RepositoryError>;

    /// Replace the stored password hash.
    ///
    /// Returns `RepositoryError::NotFound` if the identity does not exist.
    async fn set_password_hash(
        &self,
        id: AdminId,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;
}

/// Storage for catalog products.
///
/// Every mutating call is a single committed statement, so a successful
/// return is immediately visible to subsequent reads.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products newest first, optionally restricted to one category.
    async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, RepositoryError>;

    /// A single product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product; the store assigns `id` and `created_at`.
    async fn insert(
        &self,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Product, RepositoryError>;

    /// Overwrite the editable fields of a product.
    ///
    /// The image reference is only replaced when `image` is `Some`.
    /// Returns `None` if the product does not exist.
    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Remove a product. Returns `false` if it did not exist.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded catalog migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
