//! Policy binding.

use crate::capability::IdentityApi;
use crate::context::SyncContext;
use crate::error::{ProvisionError, ProvisionResult};
use platform_access::PolicyId;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Attaches a permission policy to a cloud identity.
///
/// A single attempt is made. A failure leaves the identity without its
/// intended permissions and is returned for operator attention.
#[derive(Clone)]
pub struct PolicyBinder {
    identities: Arc<dyn IdentityApi>,
}

impl PolicyBinder {
    /// Create a binder over an identity API handle.
    pub fn new(identities: Arc<dyn IdentityApi>) -> Self {
        Self { identities }
    }

    /// Bind `policy` to `identity`.
    ///
    /// `None` means the tier has no policy; nothing is attached and the call
    /// succeeds.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn bind(
        &self,
        ctx: &SyncContext,
        identity: &str,
        policy: Option<&PolicyId>,
    ) -> ProvisionResult<()> {
        let Some(policy) = policy else {
            debug!(identity, "No policy for tier, nothing to bind");
            return Ok(());
        };

        let result = ctx
            .run(self.identities.attach_policy(identity, policy))
            .await
            .ok_or(ProvisionError::Cancelled {
                operation: "attach_policy",
            })?;

        match result {
            Ok(()) => {
                info!(identity, policy = %policy, "Policy attached");
                Ok(())
            }
            Err(e) => {
                error!(identity, policy = %policy, error = %e, "Policy attachment failed");
                Err(ProvisionError::PolicyAttachFailed {
                    identity: identity.to_string(),
                    policy: policy.clone(),
                    source: e,
                })
            }
        }
    }
}

impl std::fmt::Debug for PolicyBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyBinder").finish_non_exhaustive()
    }
}
