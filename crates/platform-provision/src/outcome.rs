//! Successful results of provisioning steps and syncs.

use platform_access::{AccessTier, PolicyId};
use serde::Serialize;

/// State of a resource after an idempotent create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// The create request made the resource
    Created,
    /// The resource was already present
    AlreadyExisted,
}

/// Terminal success state of a user sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Tier is below Developer; no external call was made beyond the lookup
    Skipped {
        /// Resolved tier
        tier: AccessTier,
    },

    /// Namespace and identity are present and the policy is bound
    Provisioned {
        /// Resolved tier
        tier: AccessTier,
        /// Namespace name
        namespace: String,
        /// Namespace state
        namespace_state: ResourceState,
        /// Identity name
        identity: String,
        /// Identity state
        identity_state: ResourceState,
        /// Policy bound to the identity
        policy: Option<PolicyId>,
    },
}

impl SyncOutcome {
    /// Check if the sync stopped at the tier gate.
    pub fn is_skipped(&self) -> bool {
        matches!(self, SyncOutcome::Skipped { .. })
    }

    /// Resolved tier of the synced user.
    pub fn tier(&self) -> AccessTier {
        match self {
            SyncOutcome::Skipped { tier } | SyncOutcome::Provisioned { tier, .. } => *tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_outcome() {
        let outcome = SyncOutcome::Skipped {
            tier: AccessTier::Viewer,
        };
        assert!(outcome.is_skipped());
        assert_eq!(outcome.tier(), AccessTier::Viewer);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = SyncOutcome::Provisioned {
            tier: AccessTier::Developer,
            namespace: "user-dana".to_string(),
            namespace_state: ResourceState::AlreadyExisted,
            identity: "openshift-dana".to_string(),
            identity_state: ResourceState::Created,
            policy: Some(PolicyId::new("arn:dev")),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "provisioned");
        assert_eq!(json["tier"], "developer");
        assert_eq!(json["namespace_state"], "already_existed");
        assert_eq!(json["policy"], "arn:dev");
    }
}
