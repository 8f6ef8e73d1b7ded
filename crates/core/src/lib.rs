//! WFA Core - Shared domain types.
//!
//! This crate provides the types used across all WFA catalog components:
//! - `web` - Public catalog site and admin panel
//! - `cli` - Command-line tools for migrations and provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, usernames, categories, prices and stored image names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
