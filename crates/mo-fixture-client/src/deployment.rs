//! Handles for deployments launched through the orchestration service.
//!
//! A handle is created in memory from a built configuration and gains its id
//! and connection string on [`Deployment::start`]. The service owns the
//! processes; handles only remember what it reported.
//!
//! # Lifecycle
//!
//! ```text
//!   new ──start──▶ running ──stop(destroy=false)──▶ stopped ──start──▶ running
//!                     │                                                   │
//!                     └──────────────stop(destroy=true)───────────────────┴──▶ deleted
//! ```
//!
//! Starting a handle that already has an id sends a `start` action for that
//! id instead of creating a new deployment.

use std::time::Duration;

use mo_fixture_core::{ReplicaSetConfig, ServerConfig, ShardedClusterConfig, TopologyConfig};

use crate::client::OrchestrationClient;
use crate::error::{ClientError, Result};
use crate::resource::{Action, Resource};
use crate::types::{
    member_state, Endpoint, ReplicaSetInfo, RestartTiming, ServerInfo, ShardedClusterInfo,
};

/// A standalone server, or one member of a replica set.
#[derive(Debug, Clone, Default)]
pub struct Server {
    id: Option<String>,
    uri: Option<String>,
    config: Option<ServerConfig>,
}

impl Server {
    /// A server that will be created from `config`.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            id: None,
            uri: None,
            config: Some(config),
        }
    }

    /// A server that already exists on the service, such as a replica set member.
    #[must_use]
    pub fn attached(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            uri: Some(uri.into()),
            config: None,
        }
    }

    /// Orchestration id, once started.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Connection string (or `host:port` for members), once started.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Configuration this server was created from, if it was created by this handle.
    #[must_use]
    pub fn config(&self) -> Option<&ServerConfig> {
        self.config.as_ref()
    }

    /// Create the server, or start it again if it was stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request.
    pub async fn start(&mut self, client: &OrchestrationClient) -> Result<()> {
        if let Some(id) = &self.id {
            tracing::info!(id = %id, "Starting server");
            return client.action(Resource::Servers, id, Action::Start).await;
        }

        let config = self
            .config
            .clone()
            .ok_or(ClientError::NotStarted(Resource::Servers))?;

        let response = client
            .create(Resource::Servers, &TopologyConfig::Server(config))
            .await?;
        let info: ServerInfo = OrchestrationClient::decode(response)?;

        self.apply(&info.endpoint, client.has_credentials());
        tracing::info!(id = %info.endpoint.id, "Server created");
        Ok(())
    }

    /// Delete the server, or only stop its process when `destroy` is false.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotStarted` if the server has no id, or an error
    /// if the service rejects the request.
    pub async fn stop(&mut self, client: &OrchestrationClient, destroy: bool) -> Result<()> {
        let id = self.id.as_deref().ok_or(ClientError::NotStarted(Resource::Servers))?;
        stop_resource(client, Resource::Servers, id, destroy).await
    }

    fn apply(&mut self, endpoint: &Endpoint, authenticated: bool) {
        self.id = Some(endpoint.id.clone());
        self.uri = Some(endpoint.connection_uri(authenticated));
    }
}

/// A replica set and its members.
#[derive(Debug, Clone, Default)]
pub struct ReplicaSet {
    id: Option<String>,
    uri: Option<String>,
    config: Option<ReplicaSetConfig>,
    members: Vec<Server>,
    primary: Option<usize>,
    secondary: Option<usize>,
}

impl ReplicaSet {
    /// A replica set that will be created from `config`.
    #[must_use]
    pub fn new(config: ReplicaSetConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    /// Build a handle from a description returned by the service.
    #[must_use]
    pub fn from_info(info: &ReplicaSetInfo, authenticated: bool) -> Self {
        let mut rs = Self::default();
        rs.apply(info, authenticated);
        rs
    }

    /// Orchestration id, once started.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Connection string, once started.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Members as last reported by the service.
    #[must_use]
    pub fn members(&self) -> &[Server] {
        &self.members
    }

    /// Member last reported as primary.
    #[must_use]
    pub fn primary(&self) -> Option<&Server> {
        self.primary.and_then(|idx| self.members.get(idx))
    }

    /// Member last reported as secondary.
    #[must_use]
    pub fn secondary(&self) -> Option<&Server> {
        self.secondary.and_then(|idx| self.members.get(idx))
    }

    /// Create the replica set, or send a start action if it already has an id.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the request or the response
    /// cannot be parsed.
    pub async fn start(&mut self, client: &OrchestrationClient) -> Result<()> {
        if let Some(id) = &self.id {
            return client.action(Resource::ReplicaSets, id, Action::Start).await;
        }

        let config = self
            .config
            .clone()
            .ok_or(ClientError::NotStarted(Resource::ReplicaSets))?;

        let response = client
            .create(Resource::ReplicaSets, &TopologyConfig::ReplicaSet(config))
            .await?;
        let info: ReplicaSetInfo = OrchestrationClient::decode(response)?;

        self.apply(&info, client.has_credentials());
        tracing::info!(
            id = %info.endpoint.id,
            members = self.members.len(),
            "Replica set created"
        );
        Ok(())
    }

    /// Delete the replica set, or only stop it when `destroy` is false.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotStarted` if the set has no id, or an error if
    /// the service rejects the request.
    pub async fn stop(&mut self, client: &OrchestrationClient, destroy: bool) -> Result<()> {
        let id = self
            .id
            .as_deref()
            .ok_or(ClientError::NotStarted(Resource::ReplicaSets))?;
        stop_resource(client, Resource::ReplicaSets, id, destroy).await
    }

    /// Re-read the set and recompute members, primary and secondary.
    ///
    /// # Errors
    ///
    /// Returns an error if the set has no id or the service rejects the request.
    pub async fn refresh(&mut self, client: &OrchestrationClient) -> Result<()> {
        let id = self
            .id
            .clone()
            .ok_or(ClientError::NotStarted(Resource::ReplicaSets))?;

        let response = client.describe(Resource::ReplicaSets, &id).await?;
        let info: ReplicaSetInfo = OrchestrationClient::decode(response)?;
        self.apply(&info, client.has_credentials());
        Ok(())
    }

    /// Stop the primary, wait, start it again, wait, then re-read the set.
    ///
    /// The waits are fixed; nothing checks that an election has finished.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NoPrimary` if no primary is known, or an error if
    /// any request fails.
    pub async fn restart_primary(
        &mut self,
        client: &OrchestrationClient,
        timing: RestartTiming,
    ) -> Result<()> {
        let idx = self
            .primary
            .ok_or_else(|| ClientError::NoPrimary(self.id.clone().unwrap_or_default()))?;
        let primary = &mut self.members[idx];

        tracing::info!(primary = ?primary.uri(), "Stopping primary");
        primary.stop(client, false).await?;
        settle(timing.after_stop).await;

        primary.start(client).await?;
        settle(timing.after_start).await;

        self.refresh(client).await?;
        tracing::info!(primary = ?self.primary().and_then(Server::uri), "New primary");
        Ok(())
    }

    fn apply(&mut self, info: &ReplicaSetInfo, authenticated: bool) {
        self.id = Some(info.endpoint.id.clone());
        self.uri = Some(info.endpoint.connection_uri(authenticated));
        self.members.clear();
        self.primary = None;
        self.secondary = None;

        for (idx, member) in info.members.iter().enumerate() {
            self.members
                .push(Server::attached(member.server_id.clone(), member.host.clone()));
            match member.state {
                member_state::PRIMARY => self.primary = Some(idx),
                member_state::SECONDARY => self.secondary = Some(idx),
                _ => {}
            }
        }
    }
}

/// A sharded cluster and its shard replica sets.
#[derive(Debug, Clone)]
pub struct ShardedCluster {
    id: Option<String>,
    uri: Option<String>,
    config: ShardedClusterConfig,
    shards: Vec<ReplicaSet>,
}

impl ShardedCluster {
    /// A cluster that will be created from `config`.
    #[must_use]
    pub fn new(config: ShardedClusterConfig) -> Self {
        Self {
            id: None,
            uri: None,
            config,
            shards: Vec::new(),
        }
    }

    /// Orchestration id, once started.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Connection string of the routers, once started.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Shard replica sets as reported after start.
    #[must_use]
    pub fn shards(&self) -> &[ReplicaSet] {
        &self.shards
    }

    /// Router and shard layout this cluster is created from.
    #[must_use]
    pub fn config(&self) -> &ShardedClusterConfig {
        &self.config
    }

    /// Create the cluster and read back each shard's replica set, or send a
    /// start action if it already has an id.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails. Shards created before the
    /// failure are left for teardown.
    pub async fn start(&mut self, client: &OrchestrationClient) -> Result<()> {
        if let Some(id) = &self.id {
            return client
                .action(Resource::ShardedClusters, id, Action::Start)
                .await;
        }

        let response = client
            .create(
                Resource::ShardedClusters,
                &TopologyConfig::ShardedCluster(self.config.clone()),
            )
            .await?;
        let info: ShardedClusterInfo = OrchestrationClient::decode(response)?;

        let authenticated = client.has_credentials();
        let mut shards = Vec::with_capacity(info.shards.len());
        for shard in &info.shards {
            let response = client.describe(Resource::ReplicaSets, &shard.id).await?;
            let shard_info: ReplicaSetInfo = OrchestrationClient::decode(response)?;
            shards.push(ReplicaSet::from_info(&shard_info, authenticated));
        }

        // Only a fully read-back cluster counts as started.
        self.id = Some(info.endpoint.id.clone());
        self.uri = Some(info.endpoint.connection_uri(authenticated));
        self.shards = shards;

        tracing::info!(
            id = %info.endpoint.id,
            shards = self.shards.len(),
            "Sharded cluster created"
        );
        Ok(())
    }

    /// Delete the cluster, or only stop it when `destroy` is false.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotStarted` if the cluster has no id, or an error
    /// if the service rejects the request.
    pub async fn stop(&mut self, client: &OrchestrationClient, destroy: bool) -> Result<()> {
        let id = self
            .id
            .as_deref()
            .ok_or(ClientError::NotStarted(Resource::ShardedClusters))?;
        stop_resource(client, Resource::ShardedClusters, id, destroy).await
    }
}

/// Any launched deployment.
#[derive(Debug, Clone)]
pub enum Deployment {
    /// Standalone server.
    Server(Server),
    /// Replica set.
    ReplicaSet(ReplicaSet),
    /// Sharded cluster.
    ShardedCluster(ShardedCluster),
}

impl From<TopologyConfig> for Deployment {
    fn from(config: TopologyConfig) -> Self {
        match config {
            TopologyConfig::Server(config) => Self::Server(Server::new(config)),
            TopologyConfig::ReplicaSet(config) => Self::ReplicaSet(ReplicaSet::new(config)),
            TopologyConfig::ShardedCluster(config) => {
                Self::ShardedCluster(ShardedCluster::new(config))
            }
        }
    }
}

impl Deployment {
    /// Collection this deployment lives in.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Server(_) => Resource::Servers,
            Self::ReplicaSet(_) => Resource::ReplicaSets,
            Self::ShardedCluster(_) => Resource::ShardedClusters,
        }
    }

    /// Orchestration id, once started.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Server(server) => server.id(),
            Self::ReplicaSet(rs) => rs.id(),
            Self::ShardedCluster(cluster) => cluster.id(),
        }
    }

    /// Connection string, once started.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Server(server) => server.uri(),
            Self::ReplicaSet(rs) => rs.uri(),
            Self::ShardedCluster(cluster) => cluster.uri(),
        }
    }

    /// See [`Server::start`], [`ReplicaSet::start`], [`ShardedCluster::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn start(&mut self, client: &OrchestrationClient) -> Result<()> {
        match self {
            Self::Server(server) => server.start(client).await,
            Self::ReplicaSet(rs) => rs.start(client).await,
            Self::ShardedCluster(cluster) => cluster.start(client).await,
        }
    }

    /// Delete the deployment, or only stop it when `destroy` is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment was never started or the request fails.
    pub async fn stop(&mut self, client: &OrchestrationClient, destroy: bool) -> Result<()> {
        match self {
            Self::Server(server) => server.stop(client, destroy).await,
            Self::ReplicaSet(rs) => rs.stop(client, destroy).await,
            Self::ShardedCluster(cluster) => cluster.stop(client, destroy).await,
        }
    }

    /// Restart the primary of a replica set deployment.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unsupported` for other deployments, or any error
    /// from [`ReplicaSet::restart_primary`].
    pub async fn restart_primary(
        &mut self,
        client: &OrchestrationClient,
        timing: RestartTiming,
    ) -> Result<()> {
        match self {
            Self::ReplicaSet(rs) => rs.restart_primary(client, timing).await,
            other => Err(ClientError::Unsupported {
                operation: "restart primary",
                resource: other.resource(),
            }),
        }
    }
}

async fn stop_resource(
    client: &OrchestrationClient,
    resource: Resource,
    id: &str,
    destroy: bool,
) -> Result<()> {
    if destroy {
        tracing::info!(resource = %resource, id = %id, "Deleting");
        client.delete(resource, id).await
    } else {
        tracing::info!(resource = %resource, id = %id, "Stopping");
        client.action(resource, id, Action::Stop).await
    }
}

async fn settle(wait: Duration) {
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use mo_fixture_core::{ConfigBuilder, PortAllocator, ReplicaSetShape, TopologyKind};
    use serde_json::json;

    use super::*;

    #[test]
    fn handles_start_without_id() {
        let config = ConfigBuilder::new(PortAllocator::default())
            .build(TopologyKind::ReplicaSet(ReplicaSetShape::Three));
        let deployment = Deployment::from(config);

        assert_eq!(deployment.resource(), Resource::ReplicaSets);
        assert!(deployment.id().is_none());
        assert!(deployment.uri().is_none());
    }

    #[test]
    fn replica_set_roles_from_info() {
        let info: ReplicaSetInfo = serde_json::from_value(json!({
            "id": "rs-1",
            "mongodb_uri": "mongodb://localhost:27017",
            "members": [
                {"server_id": "a", "host": "localhost:27017", "state": 2},
                {"server_id": "b", "host": "localhost:27018", "state": 1},
                {"server_id": "c", "host": "localhost:27019", "state": 2},
            ],
        }))
        .unwrap();

        let rs = ReplicaSet::from_info(&info, false);
        assert_eq!(rs.members().len(), 3);
        assert_eq!(rs.primary().and_then(Server::id), Some("b"));
        assert_eq!(rs.primary().and_then(Server::uri), Some("localhost:27018"));
        assert_eq!(rs.secondary().and_then(Server::id), Some("c"));
    }

    #[test]
    fn reapplying_info_replaces_members() {
        let info: ReplicaSetInfo = serde_json::from_value(json!({
            "id": "rs-1",
            "mongodb_uri": "mongodb://localhost:27017",
            "members": [{"server_id": "a", "host": "localhost:27017", "state": 1}],
        }))
        .unwrap();

        let mut rs = ReplicaSet::from_info(&info, false);
        rs.apply(&info, false);
        assert_eq!(rs.members().len(), 1);
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected() {
        let client =
            OrchestrationClient::new("localhost:1", mo_fixture_core::RequestTemplate::default());
        let config = ConfigBuilder::new(PortAllocator::default()).build(TopologyKind::Standalone);
        let mut deployment = Deployment::from(config);

        let err = deployment.stop(&client, true).await.unwrap_err();
        assert!(matches!(err, ClientError::NotStarted(Resource::Servers)));
    }

    #[tokio::test]
    async fn restart_primary_needs_a_replica_set() {
        let client =
            OrchestrationClient::new("localhost:1", mo_fixture_core::RequestTemplate::default());
        let config = ConfigBuilder::new(PortAllocator::default()).build(TopologyKind::Standalone);
        let mut deployment = Deployment::from(config);

        let err = deployment
            .restart_primary(&client, RestartTiming::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unsupported { .. }));
    }
}
