//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tower_sessions::cookie::Key;

use crate::config::WebConfig;
use crate::db::{PgAdminStore, PgProductStore};
use crate::services::{AuthService, CatalogService, ImageStore};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("session secret is not a usable signing key: {0}")]
    SessionKey(String),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Services are constructed once and injected
/// here; nothing is reached through globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    auth: AuthService,
    catalog: CatalogService,
    session_key: Key,
}

impl AppState {
    /// Create a new application state from already-built services.
    ///
    /// # Errors
    ///
    /// Returns `StateError::SessionKey` if the session secret is shorter
    /// than 64 bytes.
    pub fn new(
        config: WebConfig,
        auth: AuthService,
        catalog: CatalogService,
    ) -> Result<Self, StateError> {
        use secrecy::ExposeSecret;

        let session_key = Key::try_from(config.session_secret.expose_secret().as_bytes())
            .map_err(|e| StateError::SessionKey(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
                session_key,
            }),
        })
    }

    /// Create the production state backed by `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// See [`AppState::new`].
    pub fn with_pool(config: WebConfig, pool: &PgPool) -> Result<Self, StateError> {
        let auth = AuthService::new(Arc::new(PgAdminStore::new(pool.clone())));
        let catalog = CatalogService::new(
            Arc::new(PgProductStore::new(pool.clone())),
            ImageStore::new(config.upload_dir.clone()),
        );
        Self::new(config, auth, catalog)
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Cookie signing key for the session layer.
    #[must_use]
    pub fn session_key(&self) -> &Key {
        &self.inner.session_key
    }
}
