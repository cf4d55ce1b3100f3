//! Permission policy catalog
//!
//! Maps access tiers to the cloud permission policy bound to a user's
//! identity. The catalog is configuration, so operators can repoint policy
//! identifiers per environment.

use crate::tier::AccessTier;
use serde::{Deserialize, Serialize};

/// Default policy bound to Admin identities.
pub const DEFAULT_ADMIN_POLICY: &str = "arn:aws:iam::123456789012:policy/OpenShiftAdminPolicy";

/// Default policy bound to Developer identities.
pub const DEFAULT_DEVELOPER_POLICY: &str =
    "arn:aws:iam::123456789012:policy/OpenShiftDeveloperPolicy";

/// Identifier of a cloud permission policy (typically an ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Create a policy identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PolicyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PolicyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Tier to policy table.
///
/// Only Developer and Admin carry a policy; lower tiers have no binding.
///
/// # Examples
///
/// ```
/// use platform_access::{AccessTier, PolicyCatalog, PolicyId};
///
/// let catalog = PolicyCatalog::new("arn:admin", "arn:dev");
/// assert_eq!(catalog.policy_for(AccessTier::Admin), Some(&PolicyId::new("arn:admin")));
/// assert_eq!(catalog.policy_for(AccessTier::Viewer), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCatalog {
    /// Policy bound to Admin identities
    pub admin: PolicyId,

    /// Policy bound to Developer identities
    pub developer: PolicyId,
}

impl PolicyCatalog {
    /// Create a catalog from the admin and developer policy identifiers.
    pub fn new(admin: impl Into<PolicyId>, developer: impl Into<PolicyId>) -> Self {
        Self {
            admin: admin.into(),
            developer: developer.into(),
        }
    }

    /// Look up the policy for a tier.
    ///
    /// # Returns
    ///
    /// The admin policy for Admin, the developer policy for Developer, and
    /// `None` for Viewer and Unassigned
    pub fn policy_for(&self, tier: AccessTier) -> Option<&PolicyId> {
        match tier {
            AccessTier::Admin => Some(&self.admin),
            AccessTier::Developer => Some(&self.developer),
            AccessTier::Viewer | AccessTier::Unassigned => None,
        }
    }
}

impl Default for PolicyCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_POLICY, DEFAULT_DEVELOPER_POLICY)
    }
}
