//! Authentication service.
//!
//! Verifies admin credentials and manages Argon2id password hashes. Session
//! state is handled separately in [`crate::middleware::auth`].

mod error;

pub use error::AuthError;

use std::sync::{Arc, LazyLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use wfa_core::Username;

use crate::db::{AdminStore, RepositoryError};
use crate::models::AdminIdentity;

/// Hash checked against when the username is unknown, so both failure
/// paths pay the same Argon2 cost.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("wfa-unknown-admin").ok());

/// Authentication service.
///
/// Cheap to clone; the underlying store is shared.
#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminStore>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(admins: Arc<dyn AdminStore>) -> Self {
        Self { admins }
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown,
    /// malformed, or the password does not match. Unknown usernames are
    /// still checked against a dummy hash.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminIdentity, AuthError> {
        let identity = match Username::parse(username) {
            Ok(username) => self.admins.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(identity) = identity else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &identity.password_hash)?;

        Ok(identity)
    }

    /// Look up an admin by username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn find(&self, username: &Username) -> Result<Option<AdminIdentity>, AuthError> {
        Ok(self.admins.find_by_username(username).await?)
    }

    /// Create a new admin with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUsername` if the username is taken.
    /// Returns `AuthError::EmptyPassword` if `password` is empty.
    pub async fn create_admin(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<AdminIdentity, AuthError> {
        let password_hash = hash_password(password)?;

        self.admins
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateUsername,
                other => AuthError::Repository(other),
            })
    }

    /// Replace an admin's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminNotFound` if no admin has this username.
    /// Returns `AuthError::EmptyPassword` if `password` is empty.
    pub async fn set_password(&self, username: &Username, password: &str) -> Result<(), AuthError> {
        let identity = self
            .admins
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AdminNotFound)?;

        let password_hash = hash_password(password)?;

        self.admins
            .set_password_hash(identity.id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AdminNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Whether `password` matches the identity's stored hash.
    #[must_use]
    pub fn verify(identity: &AdminIdentity, password: &str) -> bool {
        verify_password(password, &identity.password_hash).is_ok()
    }
}

/// Hash a password with Argon2id and a random salt (PHC string format).
fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryAdminStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryAdminStore::new()))
    }

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &a).is_ok());
        assert!(verify_password("hunter23", &a).is_err());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(hash_password(""), Err(AuthError::EmptyPassword)));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let auth = service();
        let created = auth.create_admin(&name("wfa_admin"), "secret").await.unwrap();
        assert!(AuthService::verify(&created, "secret"));

        let identity = auth.authenticate("wfa_admin", "secret").await.unwrap();
        assert_eq!(identity.id, created.id);

        assert!(matches!(
            auth.authenticate("wfa_admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("nobody", "secret").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("", "secret").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_matches_real_hash_cost() {
        let real = hash_password("secret").unwrap();
        let dummy = DUMMY_HASH.as_deref().unwrap();

        let real = PasswordHash::new(&real).unwrap();
        let dummy = PasswordHash::new(dummy).unwrap();
        assert_eq!(dummy.algorithm.as_str(), real.algorithm.as_str());
        assert_eq!(dummy.version, real.version);
        assert_eq!(dummy.params.to_string(), real.params.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_costs_as_much_as_wrong_password() {
        use std::time::Instant;

        let auth = service();
        auth.create_admin(&name("wfa_admin"), "secret").await.unwrap();
        // Build the dummy hash outside the timed section.
        LazyLock::force(&DUMMY_HASH);

        let start = Instant::now();
        assert!(auth.authenticate("wfa_admin", "x").await.is_err());
        let known = start.elapsed();

        let start = Instant::now();
        assert!(auth.authenticate("nobody", "x").await.is_err());
        let unknown = start.elapsed();

        assert!(
            unknown * 10 >= known,
            "unknown user took {unknown:?}, wrong password took {known:?}"
        );
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let auth = service();
        auth.create_admin(&name("wfa_admin"), "one").await.unwrap();
        assert!(matches!(
            auth.create_admin(&name("wfa_admin"), "two").await,
            Err(AuthError::DuplicateUsername)
        ));
        // The original password still works.
        auth.authenticate("wfa_admin", "one").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_password() {
        let auth = service();
        auth.create_admin(&name("wfa_admin"), "old").await.unwrap();
        auth.set_password(&name("wfa_admin"), "new").await.unwrap();

        assert!(auth.authenticate("wfa_admin", "old").await.is_err());
        auth.authenticate("wfa_admin", "new").await.unwrap();

        assert!(matches!(
            auth.set_password(&name("ghost"), "x").await,
            Err(AuthError::AdminNotFound)
        ));
    }
}
