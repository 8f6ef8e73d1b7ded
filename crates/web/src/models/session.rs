//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use wfa_core::{AdminId, Username};

use super::AdminIdentity;

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
/// Holding a `CurrentAdmin` is the proof of authentication that mutating
/// catalog operations require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminId,
    /// Admin's login name.
    pub username: Username,
}

impl From<&AdminIdentity> for CurrentAdmin {
    fn from(identity: &AdminIdentity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the pending flash notice.
    pub const FLASH: &str = "flash";
}
