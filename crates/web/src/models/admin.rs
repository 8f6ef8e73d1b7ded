//! Administrator identity.

use wfa_core::{AdminId, Username};

/// An administrator able to manage the catalog.
///
/// A plain record: authentication is a capability of
/// [`AuthService`](crate::services::auth::AuthService), not of the identity.
#[derive(Clone)]
pub struct AdminIdentity {
    /// Unique, immutable ID.
    pub id: AdminId,
    /// Unique login name, immutable after creation.
    pub username: Username,
    /// Argon2 PHC string. Opaque outside the auth service.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminIdentity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let identity = AdminIdentity {
            id: AdminId::new(1),
            username: Username::parse("wfa_admin").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
        };
        let debug_output = format!("{identity:?}");
        assert!(debug_output.contains("wfa_admin"));
        assert!(!debug_output.contains("argon2id"));
    }
}
