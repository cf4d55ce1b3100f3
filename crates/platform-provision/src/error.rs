//! Error types for provisioning and sync operations
//!
//! `ProvisionError` is returned by the individual provisioners.
//! `SyncError` is the single terminal failure of a user sync and tells the
//! caller which step failed.

use crate::capability::{ClientError, DirectoryError};
use platform_access::{PolicyId, UserId};
use thiserror::Error;

/// Provisioning step errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisionError {
    /// Cluster API rejected the namespace for a reason other than "already exists"
    #[error("Failed to create namespace {namespace}: {source}")]
    ClusterCreateFailed {
        /// Namespace name
        namespace: String,
        /// Cluster API error
        #[source]
        source: ClientError,
    },

    /// Identity creation failed on every attempt
    #[error("Failed to create identity {identity} after {attempts} attempts: {source}")]
    IdentityCreateExhausted {
        /// Identity name
        identity: String,
        /// Attempts made
        attempts: u32,
        /// Error of the last attempt
        #[source]
        source: ClientError,
    },

    /// Policy attachment failed
    #[error("Failed to attach policy {policy} to identity {identity}: {source}")]
    PolicyAttachFailed {
        /// Identity name
        identity: String,
        /// Policy that was being attached
        policy: PolicyId,
        /// Identity API error
        #[source]
        source: ClientError,
    },

    /// The caller cancelled the sync while the step was in flight
    #[error("Cancelled during {operation}")]
    Cancelled {
        /// Operation that was interrupted
        operation: &'static str,
    },
}

/// Result type for provisioning steps.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl ProvisionError {
    /// Check if this error is a cancellation rather than an API failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProvisionError::Cancelled { .. })
    }

    /// Get error code for logs and API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProvisionError::ClusterCreateFailed { .. } => "CLUSTER_CREATE_FAILED",
            ProvisionError::IdentityCreateExhausted { .. } => "IDENTITY_CREATE_EXHAUSTED",
            ProvisionError::PolicyAttachFailed { .. } => "POLICY_ATTACH_FAILED",
            ProvisionError::Cancelled { .. } => "CANCELLED",
        }
    }
}

/// User sync errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// User could not be fetched from the datastore
    #[error("Failed to look up user {user_id}: {source}")]
    UserLookupFailed {
        /// Requested user
        user_id: UserId,
        /// Datastore error
        #[source]
        source: DirectoryError,
    },

    /// Namespace provisioning failed
    #[error("Namespace provisioning failed: {0}")]
    NamespaceProvisionFailed(#[source] ProvisionError),

    /// Identity provisioning failed
    #[error("Identity provisioning failed: {0}")]
    IdentityProvisionFailed(#[source] ProvisionError),

    /// Policy binding failed
    #[error("Policy binding failed: {0}")]
    PolicyBindFailed(#[source] ProvisionError),

    /// The caller cancelled the sync
    #[error("Sync of user {user_id} cancelled")]
    Cancelled {
        /// User being synced
        user_id: UserId,
    },
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Check if re-invoking the whole sync later may succeed.
    ///
    /// Provisioning steps are idempotent, so a repeated sync converges
    /// without duplicating resources.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::UserLookupFailed { source, .. } => {
                !matches!(source, DirectoryError::NotFound(_))
            }
            SyncError::NamespaceProvisionFailed(_) | SyncError::IdentityProvisionFailed(_) => true,
            SyncError::PolicyBindFailed(_) | SyncError::Cancelled { .. } => false,
        }
    }

    /// Check if an operator should look at this failure.
    ///
    /// A failed policy binding leaves an identity without its intended
    /// permissions.
    pub fn requires_operator_attention(&self) -> bool {
        matches!(self, SyncError::PolicyBindFailed(_))
    }

    /// Get the underlying provisioning error, if any.
    pub fn provision_error(&self) -> Option<&ProvisionError> {
        match self {
            SyncError::NamespaceProvisionFailed(e)
            | SyncError::IdentityProvisionFailed(e)
            | SyncError::PolicyBindFailed(e) => Some(e),
            SyncError::UserLookupFailed { .. } | SyncError::Cancelled { .. } => None,
        }
    }

    /// Get error code for logs and API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::UserLookupFailed { .. } => "USER_LOOKUP_FAILED",
            SyncError::NamespaceProvisionFailed(_) => "NAMESPACE_PROVISION_FAILED",
            SyncError::IdentityProvisionFailed(_) => "IDENTITY_PROVISION_FAILED",
            SyncError::PolicyBindFailed(_) => "POLICY_BIND_FAILED",
            SyncError::Cancelled { .. } => "CANCELLED",
        }
    }
}
