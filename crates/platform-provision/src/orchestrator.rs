//! User sync orchestration.
//!
//! Runs the single-user reconciliation pipeline:
//!
//! ```text
//! lookup user → resolve tier → tier gate → ensure namespace
//!             → ensure identity → bind policy
//! ```
//!
//! Steps run strictly in order, one external call in flight at a time. A
//! failure aborts the pipeline without rolling back earlier steps; callers
//! recover by re-running the whole sync, which converges because namespace
//! and identity creation are idempotent.

use crate::binding::PolicyBinder;
use crate::capability::{ClusterApi, IdentityApi, UserDirectory};
use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::error::{ProvisionError, SyncError, SyncResult};
use crate::identity::IdentityProvisioner;
use crate::namespace::NamespaceProvisioner;
use crate::outcome::SyncOutcome;
use platform_access::{AccessTier, UserId};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Reconciles one user against the cluster and the cloud identity provider.
///
/// The orchestrator holds only shared capability handles and immutable
/// configuration. Everything derived during a sync, including the access
/// tier, is local to that invocation, so concurrent syncs do not interfere.
///
/// # Example
///
/// ```rust,no_run
/// use platform_access::{User, UserId};
/// use platform_provision::memory::{MemoryCluster, MemoryIdentityProvider, MemoryUserDirectory};
/// use platform_provision::{SyncConfig, SyncContext, SyncOrchestrator};
/// use std::sync::Arc;
///
/// async fn example() {
///     let directory = Arc::new(MemoryUserDirectory::with_users([
///         User::new(7, "alice", "alice@example.com", "admin"),
///     ]));
///     let orchestrator = SyncOrchestrator::new(
///         directory,
///         Arc::new(MemoryCluster::new()),
///         Arc::new(MemoryIdentityProvider::new()),
///         SyncConfig::default(),
///     );
///
///     let outcome = orchestrator
///         .sync_user(&SyncContext::new(), UserId(7))
///         .await
///         .unwrap();
///     assert!(!outcome.is_skipped());
/// }
/// ```
pub struct SyncOrchestrator {
    directory: Arc<dyn UserDirectory>,
    namespaces: NamespaceProvisioner,
    identities: IdentityProvisioner,
    binder: PolicyBinder,
    config: SyncConfig,
}

impl SyncOrchestrator {
    /// Create an orchestrator from capability handles and configuration.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        cluster: Arc<dyn ClusterApi>,
        identity_api: Arc<dyn IdentityApi>,
        config: SyncConfig,
    ) -> Self {
        Self {
            directory,
            namespaces: NamespaceProvisioner::new(cluster),
            identities: IdentityProvisioner::new(
                identity_api.clone(),
                config.identity_retry.clone(),
            ),
            binder: PolicyBinder::new(identity_api),
            config,
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync one user.
    ///
    /// # Returns
    ///
    /// `SyncOutcome::Skipped` if the user's tier is below Developer,
    /// `SyncOutcome::Provisioned` once namespace, identity and policy are in
    /// place, or the `SyncError` of the first failing step
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn sync_user(&self, ctx: &SyncContext, user_id: UserId) -> SyncResult<SyncOutcome> {
        let user = ctx
            .run(self.directory.user_by_id(user_id))
            .await
            .ok_or(SyncError::Cancelled { user_id })?
            .map_err(|source| {
                error!(error = %source, "User lookup failed");
                SyncError::UserLookupFailed { user_id, source }
            })?;

        let tier = AccessTier::resolve(&user.role);
        if !tier.can_provision() {
            info!(
                tier = %tier,
                role = %user.role,
                "Tier below developer, skipping provisioning"
            );
            return Ok(SyncOutcome::Skipped { tier });
        }

        let target = self.config.naming.target_for(&user);

        let namespace_state = self
            .namespaces
            .ensure_namespace(ctx, &target.namespace)
            .await
            .map_err(|e| step_failed(user_id, e, SyncError::NamespaceProvisionFailed))?;

        let identity_state = self
            .identities
            .ensure_identity(ctx, &target.identity)
            .await
            .map_err(|e| step_failed(user_id, e, SyncError::IdentityProvisionFailed))?;

        let policy = self.config.policies.policy_for(tier);
        self.binder
            .bind(ctx, &target.identity, policy)
            .await
            .map_err(|e| step_failed(user_id, e, SyncError::PolicyBindFailed))?;

        info!(
            tier = %tier,
            namespace = %target.namespace,
            identity = %target.identity,
            "User provisioned"
        );

        Ok(SyncOutcome::Provisioned {
            tier,
            namespace: target.namespace,
            namespace_state,
            identity: target.identity,
            identity_state,
            policy: policy.cloned(),
        })
    }
}

fn step_failed(
    user_id: UserId,
    err: ProvisionError,
    wrap: fn(ProvisionError) -> SyncError,
) -> SyncError {
    if err.is_cancelled() {
        info!(error = %err, "Sync cancelled");
        return SyncError::Cancelled { user_id };
    }
    let err = wrap(err);
    error!(code = err.error_code(), error = %err, "Sync failed");
    err
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{ClientError, DirectoryError};
    use crate::memory::{MemoryCluster, MemoryIdentityProvider, MemoryUserDirectory};
    use crate::outcome::ResourceState;
    use platform_access::{PolicyCatalog, PolicyId, User};

    struct Harness {
        directory: Arc<MemoryUserDirectory>,
        cluster: Arc<MemoryCluster>,
        identities: Arc<MemoryIdentityProvider>,
        orchestrator: SyncOrchestrator,
    }

    fn harness(users: Vec<User>) -> Harness {
        let directory = Arc::new(MemoryUserDirectory::with_users(users));
        let cluster = Arc::new(MemoryCluster::new());
        let identities = Arc::new(MemoryIdentityProvider::new());
        let config = SyncConfig {
            policies: PolicyCatalog::new("admin-policy", "developer-policy"),
            ..SyncConfig::default()
        };
        let orchestrator = SyncOrchestrator::new(
            directory.clone(),
            cluster.clone(),
            identities.clone(),
            config,
        );

        Harness {
            directory,
            cluster,
            identities,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_developer_gets_developer_policy() {
        let h = harness(vec![User::new(1, "dev", "dev@example.com", "developer")]);

        let outcome = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(1))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Provisioned {
                tier: AccessTier::Developer,
                namespace: "user-dev".to_string(),
                namespace_state: ResourceState::Created,
                identity: "openshift-dev".to_string(),
                identity_state: ResourceState::Created,
                policy: Some(PolicyId::new("developer-policy")),
            }
        );
        assert_eq!(
            h.identities.policies_of("openshift-dev").await,
            vec![PolicyId::new("developer-policy")]
        );
    }

    #[tokio::test]
    async fn test_unassigned_role_is_skipped() {
        let h = harness(vec![User::new(2, "x", "x@example.com", "Admin")]);

        let outcome = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(2))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Skipped {
                tier: AccessTier::Unassigned
            }
        );
        assert!(h.cluster.create_calls().await.is_empty());
        assert!(h.identities.create_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_user() {
        let h = harness(vec![]);

        let err = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(404))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SyncError::UserLookupFailed {
                user_id: UserId(404),
                source: DirectoryError::NotFound(UserId(404)),
            }
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_datastore_outage() {
        let h = harness(vec![User::new(3, "ops", "ops@example.com", "admin")]);
        h.directory
            .set_outage(DirectoryError::Connection("connection refused".to_string()))
            .await;

        let err = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(3))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "USER_LOOKUP_FAILED");
        assert!(err.is_retryable());
        assert!(h.cluster.create_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_namespace_failure_stops_pipeline() {
        let h = harness(vec![User::new(4, "nina", "nina@example.com", "developer")]);
        h.cluster
            .fail_next(ClientError::Api {
                status: 403,
                message: "forbidden".to_string(),
            })
            .await;

        let err = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(4))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::NamespaceProvisionFailed(ProvisionError::ClusterCreateFailed { .. })
        ));
        assert!(h.identities.create_calls().await.is_empty());
        assert!(h.identities.attach_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_policy_bind_failure() {
        let h = harness(vec![User::new(5, "pat", "pat@example.com", "admin")]);
        h.identities
            .fail_next_attach(ClientError::Api {
                status: 500,
                message: "ServiceFailure".to_string(),
            })
            .await;

        let err = h
            .orchestrator
            .sync_user(&SyncContext::new(), UserId(5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::PolicyBindFailed(ProvisionError::PolicyAttachFailed { .. })
        ));
        assert!(err.requires_operator_attention());
        assert!(h.cluster.contains("user-pat").await);
        assert!(h.identities.has_identity("openshift-pat").await);
    }

    #[tokio::test]
    async fn test_cancelled_before_lookup() {
        let h = harness(vec![User::new(6, "sam", "sam@example.com", "admin")]);
        let ctx = SyncContext::new();
        ctx.cancel.cancel();

        let err = h.orchestrator.sync_user(&ctx, UserId(6)).await.unwrap_err();

        assert_eq!(err, SyncError::Cancelled { user_id: UserId(6) });
        assert!(h.cluster.create_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_naming() {
        let directory = Arc::new(MemoryUserDirectory::with_users([User::new(
            8,
            "quinn",
            "quinn@example.com",
            "developer",
        )]));
        let cluster = Arc::new(MemoryCluster::new());
        let identities = Arc::new(MemoryIdentityProvider::new());
        let mut config = SyncConfig::default();
        config.naming.namespace_prefix = "dev-".to_string();
        config.naming.identity_prefix = "iam-".to_string();

        let orchestrator =
            SyncOrchestrator::new(directory, cluster.clone(), identities.clone(), config);
        orchestrator
            .sync_user(&SyncContext::new(), UserId(8))
            .await
            .unwrap();

        assert!(cluster.contains("dev-quinn").await);
        assert!(identities.has_identity("iam-quinn").await);
    }
}
