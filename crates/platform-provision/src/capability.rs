//! Collaborator capabilities.
//!
//! The sync workflow never talks to a datastore, cluster API or cloud
//! identity API directly. It receives already-constructed handles that
//! implement these traits. Handles are shared across concurrent syncs, so
//! implementations must be safe for concurrent use.

use async_trait::async_trait;
use platform_access::{PolicyId, User, UserId};
use thiserror::Error;

/// User datastore errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// No user with the given ID.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// The datastore could not be reached.
    #[error("Datastore connection error: {0}")]
    Connection(String),

    /// The lookup query failed.
    #[error("Datastore query failed: {0}")]
    Query(String),
}

/// Cluster and cloud identity API errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The resource being created already exists.
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Request never reached the API.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Check if this error means the resource is already present.
    ///
    /// Clients that do not map conflicts to [`ClientError::AlreadyExists`]
    /// are still recognised by a 409 status or by the API message.
    pub fn is_already_exists(&self) -> bool {
        match self {
            ClientError::AlreadyExists(_) => true,
            ClientError::Api { status, message } => {
                *status == 409 || message.to_lowercase().contains("already exists")
            }
            ClientError::Transport(_) => false,
        }
    }
}

/// Read access to the user datastore.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by ID.
    async fn user_by_id(&self, id: UserId) -> Result<User, DirectoryError>;
}

/// Cluster namespace API.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create a namespace.
    async fn create_namespace(&self, name: &str) -> Result<(), ClientError>;
}

/// Cloud identity and policy API.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Create an identity (cloud user).
    async fn create_identity(&self, name: &str) -> Result<(), ClientError>;

    /// Attach a permission policy to an identity.
    async fn attach_policy(&self, identity: &str, policy: &PolicyId) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_variant() {
        assert!(ClientError::AlreadyExists("user-alice".to_string()).is_already_exists());
    }

    #[test]
    fn test_already_exists_from_conflict_status() {
        let err = ClientError::Api {
            status: 409,
            message: "Conflict".to_string(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_already_exists_from_message() {
        let err = ClientError::Api {
            status: 400,
            message: "EntityAlreadyExists: User openshift-alice Already Exists".to_string(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_other_errors_are_not_already_exists() {
        let err = ClientError::Api {
            status: 500,
            message: "Internal error".to_string(),
        };
        assert!(!err.is_already_exists());
        assert!(!ClientError::Transport("connection reset".to_string()).is_already_exists());
    }
}
