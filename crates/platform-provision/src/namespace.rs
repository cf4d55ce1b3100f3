//! Cluster namespace provisioning.

use crate::capability::ClusterApi;
use crate::context::SyncContext;
use crate::error::{ProvisionError, ProvisionResult};
use crate::outcome::ResourceState;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Idempotent namespace creation.
///
/// "Already exists" is the steady state on repeated syncs and counts as
/// success. Other failures are returned without retrying; retrying is the
/// caller's decision.
#[derive(Clone)]
pub struct NamespaceProvisioner {
    cluster: Arc<dyn ClusterApi>,
}

impl NamespaceProvisioner {
    /// Create a provisioner over a cluster API handle.
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self { cluster }
    }

    /// Ensure a namespace exists.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn ensure_namespace(
        &self,
        ctx: &SyncContext,
        name: &str,
    ) -> ProvisionResult<ResourceState> {
        let result = ctx
            .run(self.cluster.create_namespace(name))
            .await
            .ok_or(ProvisionError::Cancelled {
                operation: "create_namespace",
            })?;

        match result {
            Ok(()) => {
                info!(namespace = name, "Namespace created");
                Ok(ResourceState::Created)
            }
            Err(e) if e.is_already_exists() => {
                debug!(namespace = name, "Namespace already exists");
                Ok(ResourceState::AlreadyExisted)
            }
            Err(e) => {
                error!(namespace = name, error = %e, "Namespace creation failed");
                Err(ProvisionError::ClusterCreateFailed {
                    namespace: name.to_string(),
                    source: e,
                })
            }
        }
    }
}

impl std::fmt::Debug for NamespaceProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceProvisioner").finish_non_exhaustive()
    }
}
