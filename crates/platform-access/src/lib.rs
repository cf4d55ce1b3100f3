//! # Platform Access
//!
//! This crate provides the access model used to provision platform users
//! into the cluster and the cloud identity provider.
//!
//! ## Overview
//!
//! The platform-access crate handles:
//! - **Users**: The read-only user record fetched from the user datastore
//! - **Tiers**: Ordered access tiers resolved from a user's role
//! - **Policies**: The tier to permission-policy catalog
//! - **Targets**: Namespace and identity names derived for a user
//!
//! ## Architecture
//!
//! ```text
//! User.role ──resolve──→ AccessTier ──policy_for──→ Option<PolicyId>
//! User.name ──NamingScheme──→ ProvisioningTarget { namespace, identity }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_access::{AccessTier, PolicyCatalog, ProvisioningTarget, User};
//!
//! let user = User::new(7, "alice", "alice@example.com", "admin");
//! let tier = user.access_tier();
//! assert_eq!(tier, AccessTier::Admin);
//!
//! let catalog = PolicyCatalog::default();
//! assert!(catalog.policy_for(tier).is_some());
//!
//! let target = ProvisioningTarget::for_user(&user);
//! assert_eq!(target.namespace, "user-alice");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod policy;
pub mod target;
pub mod tier;
pub mod user;

// Re-export main types for convenience
pub use policy::{PolicyCatalog, PolicyId, DEFAULT_ADMIN_POLICY, DEFAULT_DEVELOPER_POLICY};
pub use target::{NamingScheme, ProvisioningTarget};
pub use tier::AccessTier;
pub use user::{User, UserId};
