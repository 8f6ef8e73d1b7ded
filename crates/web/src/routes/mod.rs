//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Landing page
//! GET  /catalog?cat=parts|detailing    - Product list, optionally filtered
//! GET  /produse?cat=piese|detailing    - Legacy catalog URL
//! GET  /contact                        - Contact page
//!
//! # Admin (session required except login)
//! GET  /admin/login                    - Login form
//! POST /admin/login                    - Authenticate
//! GET  /admin/logout                   - Destroy session
//! GET  /admin                          - Management list
//! GET  /admin/products/new             - Creation form
//! POST /admin/products/new             - Create (multipart)
//! GET  /admin/products/{id}/edit       - Edit form
//! POST /admin/products/{id}/edit       - Update (multipart)
//! POST /admin/products/{id}/delete     - Delete
//! ```

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod home;

use axum::{Router, routing::get};

use wfa_core::ProductId;

use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;

/// Build the application router (without state or outer layers).
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/catalog", get(catalog::index))
        .route("/produse", get(catalog::legacy_index))
        .route("/contact", get(contact::index))
        .merge(admin::router(max_upload_bytes))
}

/// A product prepared for display.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub category_label: &'static str,
    pub price: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.as_str(),
            category_label: product.category.label(),
            price: product.price.to_string(),
            description: product.description.clone().unwrap_or_default(),
            image_url: product.image.as_ref().map(|name| format!("/uploads/{name}")),
            created_at: product.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Parse a product id path segment; anything non-numeric is a 404.
fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}
