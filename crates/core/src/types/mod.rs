//! Core types for the WFA catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod image;
pub mod price;
pub mod username;

pub use category::{Category, CategoryError};
pub use id::*;
pub use image::StoredImageName;
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
