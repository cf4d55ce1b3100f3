//! # Platform Provision
//!
//! This crate reconciles a single platform user against the cluster
//! namespace provisioner and the cloud identity/policy provisioner.
//!
//! ## Overview
//!
//! The platform-provision crate handles:
//! - **Capabilities**: Traits for the user datastore, cluster API and
//!   cloud identity API
//! - **Namespaces**: Idempotent namespace creation
//! - **Identities**: Identity creation with a bounded retry loop
//! - **Policies**: Binding the tier's policy to the identity
//! - **Orchestration**: The single-user, single-pass sync pipeline
//!
//! ## Architecture
//!
//! ```text
//! SyncOrchestrator
//!   ├─ UserDirectory ──────────→ User ──→ AccessTier (platform-access)
//!   ├─ NamespaceProvisioner ───→ ClusterApi::create_namespace
//!   ├─ IdentityProvisioner ────→ IdentityApi::create_identity (retried)
//!   └─ PolicyBinder ───────────→ IdentityApi::attach_policy
//! ```
//!
//! Users below the Developer tier are skipped after the lookup. "Already
//! exists" answers from the cluster or identity API count as success, so a
//! sync can be re-run any number of times.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use platform_access::UserId;
//! use platform_provision::memory::{MemoryCluster, MemoryIdentityProvider, MemoryUserDirectory};
//! use platform_provision::{SyncConfig, SyncContext, SyncOrchestrator};
//! use std::sync::Arc;
//!
//! async fn run() {
//!     let orchestrator = SyncOrchestrator::new(
//!         Arc::new(MemoryUserDirectory::new()),
//!         Arc::new(MemoryCluster::new()),
//!         Arc::new(MemoryIdentityProvider::new()),
//!         SyncConfig::from_env(),
//!     );
//!
//!     match orchestrator.sync_user(&SyncContext::new(), UserId(42)).await {
//!         Ok(outcome) => println!("synced: {:?}", outcome),
//!         Err(e) => eprintln!("{}: {}", e.error_code(), e),
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! All steps emit `tracing` events inside spans carrying the sync's
//! correlation ID. The crate does not install a subscriber.

pub mod binding;
pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod memory;
pub mod namespace;
pub mod orchestrator;
pub mod outcome;
pub mod retry;

// Re-export main types
pub use binding::PolicyBinder;
pub use capability::{ClientError, ClusterApi, DirectoryError, IdentityApi, UserDirectory};
pub use config::{ConfigError, SyncConfig};
pub use context::SyncContext;
pub use error::{ProvisionError, ProvisionResult, SyncError, SyncResult};
pub use identity::IdentityProvisioner;
pub use namespace::NamespaceProvisioner;
pub use orchestrator::SyncOrchestrator;
pub use outcome::{ResourceState, SyncOutcome};
pub use retry::{with_retry_cancellable, RetryConfig, RetryError};
