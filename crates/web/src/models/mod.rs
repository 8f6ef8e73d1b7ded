//! Domain models for the catalog and admin panel.

pub mod admin;
pub mod flash;
pub mod product;
pub mod session;

pub use admin::AdminIdentity;
pub use flash::{Flash, FlashKind};
pub use product::{Product, ProductDraft, ProductForm};
pub use session::{CurrentAdmin, keys as session_keys};
