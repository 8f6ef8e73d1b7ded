//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Admin credential verification and password management
//! - `images` - Product image ingest into the image area
//! - `catalog` - Product create/read/update/delete and category filtering
//! - `bootstrap` - Schema setup and default admin provisioning

pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod images;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
pub use images::{ImageError, ImageStore, Upload};
