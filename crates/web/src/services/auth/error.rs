//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are deliberately
    /// indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An admin with this username already exists.
    #[error("username already exists")]
    DuplicateUsername,

    /// No admin with this username.
    #[error("admin not found")]
    AdminNotFound,

    /// Empty passwords are never stored.
    #[error("password must not be empty")]
    EmptyPassword,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
