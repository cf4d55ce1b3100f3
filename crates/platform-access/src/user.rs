//! Platform user records
//!
//! The user record is owned by the external user datastore. The sync
//! workflow only holds a read-only copy for the duration of one run.

use crate::tier::AccessTier;
use serde::{Deserialize, Serialize};

/// Unique, immutable identifier of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A platform user as stored in the user datastore.
///
/// # Examples
///
/// ```
/// use platform_access::{AccessTier, User};
///
/// let user = User::new(7, "alice", "alice@example.com", "admin");
/// assert_eq!(user.access_tier(), AccessTier::Admin);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Display name, used to derive resource names
    pub name: String,

    /// Email address (informational)
    pub email: String,

    /// Role string, e.g. "admin", "developer" or "viewer"
    pub role: String,

    /// Whether the account is active
    pub active: bool,
}

impl User {
    /// Create an active user.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            active: true,
        }
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Resolve the user's access tier.
    ///
    /// Only the role participates; name, email and the active flag never
    /// influence the tier.
    pub fn access_tier(&self) -> AccessTier {
        AccessTier::resolve(&self.role)
    }
}
