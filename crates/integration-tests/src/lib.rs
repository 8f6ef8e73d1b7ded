//! Integration test harness for the WFA catalog.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p wfa-integration-tests
//!
//! # PostgreSQL tests
//! WFA_TEST_DATABASE_URL=postgres://... cargo test -p wfa-integration-tests -- --ignored
//! ```
//!
//! [`TestApp::spawn`] serves the real router on an ephemeral port, backed by
//! in-memory admin/product/session stores and a temporary image area, and
//! drives it with a cookie-keeping `reqwest` client.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use tempfile::TempDir;
use tower_sessions::MemoryStore;
use url::Url;

use wfa_core::{AdminId, Username};
use wfa_web::db::memory::{MemoryAdminStore, MemoryProductStore};
use wfa_web::models::{CurrentAdmin, Product, ProductForm};
use wfa_web::services::{AuthService, CatalogService, ImageStore};
use wfa_web::{AppState, WebConfig};

/// Password used by [`TestApp::spawn_with_admin`].
pub const ADMIN_PASSWORD: &str = "WFA#Garage2025";

/// Username used by [`TestApp::spawn_with_admin`].
pub const ADMIN_USERNAME: &str = "wfa_admin";

const TEST_SESSION_SECRET: &str =
    "k7Qz2pLx9VbN4mRt8WcY1uJh6GdF3sAe0iOo5KlPzXqMnBvCjTyUwRgHfEaDsLk2";

/// A running application with direct access to its services.
pub struct TestApp {
    pub base_url: String,
    /// Client that keeps cookies and does not follow redirects.
    pub client: Client,
    pub auth: AuthService,
    pub catalog: CatalogService,
    upload_dir: TempDir,
}

impl TestApp {
    /// Start an app with empty stores.
    pub async fn spawn() -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let auth = AuthService::new(Arc::new(MemoryAdminStore::new()));
        let catalog = CatalogService::new(
            Arc::new(MemoryProductStore::new()),
            ImageStore::new(upload_dir.path()),
        );

        let state = AppState::new(test_config(upload_dir.path()), auth.clone(), catalog.clone())
            .expect("Failed to create application state");
        let app = wfa_web::app(state, MemoryStore::default());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            auth,
            catalog,
            upload_dir,
        }
    }

    /// Start an app with the default admin already provisioned.
    pub async fn spawn_with_admin() -> Self {
        let app = Self::spawn().await;
        app.auth
            .create_admin(&Username::parse(ADMIN_USERNAME).unwrap(), ADMIN_PASSWORD)
            .await
            .expect("Failed to create test admin");
        app
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The temporary image area.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/admin/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("POST /admin/login failed")
    }

    /// Log in as the provisioned admin and assert it worked.
    pub async fn login(&self) {
        let response = self.post_login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(location(&response).as_deref(), Some("/admin"));
    }

    pub async fn post_multipart(&self, path: &str, form: reqwest::multipart::Form) -> Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("multipart POST failed")
    }

    pub async fn post_empty(&self, path: &str) -> Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("POST failed")
    }

    /// Insert a product directly through the catalog service.
    pub async fn seed_product(&self, name: &str, category: &str, price: &str) -> Product {
        let form = ProductForm {
            name: name.to_owned(),
            category: category.to_owned(),
            price: Some(price.to_owned()),
            description: None,
        };
        self.catalog
            .create(&seed_admin(), &form, None)
            .await
            .expect("Failed to seed product")
    }
}

/// Multipart body for the admin product forms.
#[must_use]
pub fn product_form(
    name: &str,
    category: &str,
    price: &str,
    image: Option<(&str, &[u8])>,
) -> reqwest::multipart::Form {
    let form = reqwest::multipart::Form::new()
        .text("name", name.to_owned())
        .text("category", category.to_owned())
        .text("price", price.to_owned())
        .text("description", String::new());

    match image {
        Some((filename, bytes)) => form.part(
            "image",
            reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_owned()),
        ),
        None => form.part(
            "image",
            reqwest::multipart::Part::bytes(Vec::new()).file_name(String::new()),
        ),
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Configuration pointing at the temporary image area.
#[must_use]
pub fn test_config(upload_dir: &Path) -> WebConfig {
    WebConfig {
        database_url: SecretString::from("postgres://unused"),
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        base_url: Url::parse("http://127.0.0.1").unwrap(),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        upload_dir: upload_dir.to_path_buf(),
        static_dir: static_dir(),
        max_upload_bytes: 1024 * 1024,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../web/static")
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn seed_admin() -> CurrentAdmin {
    CurrentAdmin {
        id: AdminId::new(1),
        username: Username::parse(ADMIN_USERNAME).unwrap(),
    }
}
