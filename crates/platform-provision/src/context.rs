//! Per-sync context.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Context for one sync invocation.
///
/// Carries the caller's cancellation token, which is forwarded through
/// every external call, and a correlation ID for log correlation.
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Cancellation signal supplied by the caller
    pub cancel: CancellationToken,

    /// Request correlation ID
    pub correlation_id: String,
}

impl SyncContext {
    /// Create a context with a fresh token and correlation ID.
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Create a context that observes a caller-owned token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            correlation_id: uuid::Uuid::now_v7().to_string(),
        }
    }

    /// Set the correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// Check if the caller has cancelled the sync.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a future unless the sync is cancelled first.
    ///
    /// Returns `None` if cancellation won; the future is dropped and its
    /// outcome is never observed.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_correlation_id() {
        let a = SyncContext::new();
        let b = SyncContext::new();

        assert!(!a.correlation_id.is_empty());
        assert_ne!(a.correlation_id, b.correlation_id);
        assert!(!a.is_cancelled());
    }

    #[test]
    fn test_with_correlation_id() {
        let ctx = SyncContext::new().with_correlation_id("req-123");
        assert_eq!(ctx.correlation_id, "req-123");
    }

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = SyncContext::new();
        assert_eq!(ctx.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_run_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = SyncContext::with_token(token.clone());
        token.cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.run(async { 7 }).await, None);
    }
}
