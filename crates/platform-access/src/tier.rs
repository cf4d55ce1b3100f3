//! Access tiers
//!
//! This module defines the ordered access tiers a platform user can hold and
//! the mapping from a user's role string to a tier.

use serde::{Deserialize, Serialize};

/// Access tier of a platform user.
///
/// Tiers are ordered, and comparisons are by ordinal.
/// The hierarchy is: Unassigned < Viewer < Developer < Admin
///
/// # Provisioning Model
///
/// - **Unassigned**: Unknown or missing role, nothing is provisioned
/// - **Viewer**: Read-only platform access, nothing is provisioned
/// - **Developer**: Namespace and cloud identity with the developer policy
/// - **Admin**: Namespace and cloud identity with the admin policy
///
/// # Examples
///
/// ```
/// use platform_access::AccessTier;
///
/// let tier = AccessTier::resolve("developer");
/// assert_eq!(tier, AccessTier::Developer);
/// assert!(tier.can_provision());
///
/// assert_eq!(AccessTier::resolve("Admin"), AccessTier::Unassigned);
/// ```
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// No recognised role
    #[default]
    Unassigned = 0,

    /// Read-only access
    Viewer = 1,

    /// Gets a namespace and a cloud identity
    Developer = 2,

    /// Gets a namespace and an administrative cloud identity
    Admin = 3,
}

impl AccessTier {
    /// Resolve the access tier for a role string.
    ///
    /// This is a total function: role strings are matched exactly, and any
    /// other value (empty, different casing, unknown) resolves to
    /// [`AccessTier::Unassigned`] rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_access::AccessTier;
    ///
    /// assert_eq!(AccessTier::resolve("admin"), AccessTier::Admin);
    /// assert_eq!(AccessTier::resolve("viewer"), AccessTier::Viewer);
    /// assert_eq!(AccessTier::resolve(""), AccessTier::Unassigned);
    /// ```
    pub fn resolve(role: &str) -> Self {
        match role {
            "admin" => Self::Admin,
            "developer" => Self::Developer,
            "viewer" => Self::Viewer,
            _ => Self::Unassigned,
        }
    }

    /// Numeric level of the tier (0 to 3).
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Check if users at this tier get cluster and cloud resources.
    ///
    /// # Returns
    ///
    /// `true` for Developer and Admin tiers
    pub fn can_provision(&self) -> bool {
        *self >= AccessTier::Developer
    }

    /// Get string representation of the tier.
    ///
    /// For every tier except `Unassigned` this is the role string that
    /// resolves to it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Viewer => "viewer",
            Self::Developer => "developer",
            Self::Admin => "admin",
        }
    }

    /// Get a human-readable display name for the tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unassigned => "Unassigned",
            Self::Viewer => "Viewer",
            Self::Developer => "Developer",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
