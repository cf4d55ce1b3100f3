//! Provisioning targets
//!
//! Derives the cluster namespace and cloud identity names for a user.

use crate::user::User;
use serde::{Deserialize, Serialize};

/// Prefixes used to derive resource names from a user's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingScheme {
    /// Prefix of the user's cluster namespace
    pub namespace_prefix: String,

    /// Prefix of the user's cloud identity
    pub identity_prefix: String,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            namespace_prefix: "user-".to_string(),
            identity_prefix: "openshift-".to_string(),
        }
    }
}

impl NamingScheme {
    /// Derive the provisioning target for a user.
    pub fn target_for(&self, user: &User) -> ProvisioningTarget {
        ProvisioningTarget {
            namespace: format!("{}{}", self.namespace_prefix, user.name),
            identity: format!("{}{}", self.identity_prefix, user.name),
        }
    }
}

/// Names of the resources provisioned for one user.
///
/// Computed fresh on every sync and never persisted. The display name is
/// embedded verbatim.
///
/// # Examples
///
/// ```
/// use platform_access::{ProvisioningTarget, User};
///
/// let user = User::new(7, "alice", "alice@example.com", "admin");
/// let target = ProvisioningTarget::for_user(&user);
/// assert_eq!(target.namespace, "user-alice");
/// assert_eq!(target.identity, "openshift-alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningTarget {
    /// Cluster namespace name
    pub namespace: String,

    /// Cloud identity name
    pub identity: String,
}

impl ProvisioningTarget {
    /// Derive the target with the default naming scheme.
    pub fn for_user(user: &User) -> Self {
        NamingScheme::default().target_for(user)
    }
}
