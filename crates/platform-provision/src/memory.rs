//! In-memory capability implementations.
//!
//! These are suitable for local runs and testing. They record every call
//! and can be scripted to fail, so provisioning behaviour can be exercised
//! without a cluster or a cloud account.

use crate::capability::{ClientError, ClusterApi, DirectoryError, IdentityApi, UserDirectory};
use async_trait::async_trait;
use platform_access::{PolicyId, User, UserId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory user datastore.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    outage: Arc<RwLock<Option<DirectoryError>>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the given users.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Arc::new(RwLock::new(users)),
            outage: Arc::new(RwLock::new(None)),
        }
    }

    /// Insert or replace a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Make every lookup fail with `error` until [`Self::restore`] is called.
    pub async fn set_outage(&self, error: DirectoryError) {
        *self.outage.write().await = Some(error);
    }

    /// Clear a simulated outage.
    pub async fn restore(&self) {
        *self.outage.write().await = None;
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn user_by_id(&self, id: UserId) -> Result<User, DirectoryError> {
        if let Some(error) = self.outage.read().await.clone() {
            return Err(error);
        }

        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::NotFound(id))
    }
}

/// In-memory cluster namespace API.
///
/// Creating a namespace that is present returns
/// [`ClientError::AlreadyExists`].
#[derive(Debug, Default)]
pub struct MemoryCluster {
    namespaces: Arc<RwLock<HashSet<String>>>,
    failures: Arc<RwLock<VecDeque<ClientError>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MemoryCluster {
    /// Create a cluster with no namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace as if it had been created out of band.
    pub async fn insert_namespace(&self, name: impl Into<String>) {
        self.namespaces.write().await.insert(name.into());
    }

    /// Fail the next create request with `error`.
    ///
    /// Queued failures are consumed in order, one per request.
    pub async fn fail_next(&self, error: ClientError) {
        self.failures.write().await.push_back(error);
    }

    /// Check if a namespace exists.
    pub async fn contains(&self, name: &str) -> bool {
        self.namespaces.read().await.contains(name)
    }

    /// Names passed to every create request, in order.
    pub async fn create_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl ClusterApi for MemoryCluster {
    async fn create_namespace(&self, name: &str) -> Result<(), ClientError> {
        self.calls.write().await.push(name.to_string());

        if let Some(error) = self.failures.write().await.pop_front() {
            return Err(error);
        }

        if !self.namespaces.write().await.insert(name.to_string()) {
            return Err(ClientError::AlreadyExists(format!(
                "namespaces \"{}\" already exists",
                name
            )));
        }
        Ok(())
    }
}

/// Scripted failure behaviour for identity creation.
#[derive(Debug, Clone, Default)]
enum CreateFailures {
    #[default]
    None,
    Next(u32, ClientError),
    Always(ClientError),
}

/// In-memory cloud identity and policy API.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    identities: Arc<RwLock<HashSet<String>>>,
    attached: Arc<RwLock<HashMap<String, Vec<PolicyId>>>>,
    create_failures: Arc<RwLock<CreateFailures>>,
    attach_failures: Arc<RwLock<VecDeque<ClientError>>>,
    create_calls: Arc<RwLock<Vec<String>>>,
    attach_calls: Arc<RwLock<Vec<(String, PolicyId)>>>,
}

impl MemoryIdentityProvider {
    /// Create a provider with no identities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity as if it had been created out of band.
    pub async fn insert_identity(&self, name: impl Into<String>) {
        self.identities.write().await.insert(name.into());
    }

    /// Fail the next `count` create requests with `error`.
    pub async fn fail_next_creates(&self, count: u32, error: ClientError) {
        *self.create_failures.write().await = if count == 0 {
            CreateFailures::None
        } else {
            CreateFailures::Next(count, error)
        };
    }

    /// Fail every create request with `error`.
    pub async fn fail_all_creates(&self, error: ClientError) {
        *self.create_failures.write().await = CreateFailures::Always(error);
    }

    /// Fail the next attach request with `error`.
    pub async fn fail_next_attach(&self, error: ClientError) {
        self.attach_failures.write().await.push_back(error);
    }

    /// Check if an identity exists.
    pub async fn has_identity(&self, name: &str) -> bool {
        self.identities.read().await.contains(name)
    }

    /// Policies attached to an identity, in attach order.
    pub async fn policies_of(&self, identity: &str) -> Vec<PolicyId> {
        self.attached
            .read()
            .await
            .get(identity)
            .cloned()
            .unwrap_or_default()
    }

    /// Names passed to every create request, in order.
    pub async fn create_calls(&self) -> Vec<String> {
        self.create_calls.read().await.clone()
    }

    /// Arguments of every attach request, in order.
    pub async fn attach_calls(&self) -> Vec<(String, PolicyId)> {
        self.attach_calls.read().await.clone()
    }

    async fn scripted_create_failure(&self) -> Option<ClientError> {
        let mut failures = self.create_failures.write().await;
        let (error, drained) = match &mut *failures {
            CreateFailures::None => return None,
            CreateFailures::Always(error) => return Some(error.clone()),
            CreateFailures::Next(remaining, error) => {
                *remaining = remaining.saturating_sub(1);
                (error.clone(), *remaining == 0)
            }
        };
        if drained {
            *failures = CreateFailures::None;
        }
        Some(error)
    }
}

#[async_trait]
impl IdentityApi for MemoryIdentityProvider {
    async fn create_identity(&self, name: &str) -> Result<(), ClientError> {
        self.create_calls.write().await.push(name.to_string());

        if let Some(error) = self.scripted_create_failure().await {
            return Err(error);
        }

        if !self.identities.write().await.insert(name.to_string()) {
            return Err(ClientError::AlreadyExists(format!(
                "User with name {} already exists.",
                name
            )));
        }
        Ok(())
    }

    async fn attach_policy(&self, identity: &str, policy: &PolicyId) -> Result<(), ClientError> {
        self.attach_calls
            .write()
            .await
            .push((identity.to_string(), policy.clone()));

        if let Some(error) = self.attach_failures.write().await.pop_front() {
            return Err(error);
        }

        if !self.identities.read().await.contains(identity) {
            return Err(ClientError::Api {
                status: 404,
                message: format!("NoSuchEntity: The user with name {} cannot be found.", identity),
            });
        }

        let mut attached = self.attached.write().await;
        let policies = attached.entry(identity.to_string()).or_default();
        if !policies.contains(policy) {
            policies.push(policy.clone());
        }
        Ok(())
    }
}
