//! Cloud identity provisioning.

use crate::capability::{ClientError, IdentityApi};
use crate::context::SyncContext;
use crate::error::{ProvisionError, ProvisionResult};
use crate::outcome::ResourceState;
use crate::retry::{with_retry_cancellable, RetryConfig, RetryError};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Identity creation with a bounded number of attempts.
///
/// The loop stops on the first success or the first "already exists".
/// Failures are retried without inspecting their type. With the default
/// [`RetryConfig::identity_default`] there is no delay between attempts.
#[derive(Clone)]
pub struct IdentityProvisioner {
    identities: Arc<dyn IdentityApi>,
    retry: RetryConfig,
}

impl IdentityProvisioner {
    /// Create a provisioner over an identity API handle.
    pub fn new(identities: Arc<dyn IdentityApi>, retry: RetryConfig) -> Self {
        Self { identities, retry }
    }

    /// Retry policy in effect.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Ensure a cloud identity exists.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn ensure_identity(
        &self,
        ctx: &SyncContext,
        name: &str,
    ) -> ProvisionResult<ResourceState> {
        let result = with_retry_cancellable(&self.retry, &ctx.cancel, "create_identity", || {
            let identities = self.identities.clone();
            async move {
                match identities.create_identity(name).await {
                    Ok(()) => Ok(ResourceState::Created),
                    Err(e) if e.is_already_exists() => Ok(ResourceState::AlreadyExisted),
                    Err(e) => Err(e),
                }
            }
        })
        .await;

        match result {
            Ok(ResourceState::Created) => {
                info!(identity = name, "Identity created");
                Ok(ResourceState::Created)
            }
            Ok(ResourceState::AlreadyExisted) => {
                debug!(identity = name, "Identity already exists");
                Ok(ResourceState::AlreadyExisted)
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                Err(exhausted(name, attempts, last))
            }
            Err(RetryError::Cancelled) => Err(ProvisionError::Cancelled {
                operation: "create_identity",
            }),
        }
    }
}

fn exhausted(identity: &str, attempts: u32, last: ClientError) -> ProvisionError {
    ProvisionError::IdentityCreateExhausted {
        identity: identity.to_string(),
        attempts,
        source: last,
    }
}

impl std::fmt::Debug for IdentityProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityProvisioner")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
