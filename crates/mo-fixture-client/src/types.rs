//! Response shapes returned by mongo-orchestration and lifecycle settings.

use std::time::Duration;

use serde::Deserialize;

/// Identity and connection strings common to every deployment description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    /// Orchestration id.
    pub id: String,
    /// Connection string without credentials.
    pub mongodb_uri: String,
    /// Connection string with credentials, present when the deployment has auth.
    #[serde(default)]
    pub mongodb_auth_uri: Option<String>,
}

impl Endpoint {
    /// Pick the connection string: the authenticated one when the request
    /// carried credentials and the service reported one, the plain one otherwise.
    #[must_use]
    pub fn connection_uri(&self, authenticated: bool) -> String {
        match (&self.mongodb_auth_uri, authenticated) {
            (Some(auth_uri), true) => auth_uri.clone(),
            _ => self.mongodb_uri.clone(),
        }
    }
}

/// Description of a standalone server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    /// Id and connection strings.
    #[serde(flatten)]
    pub endpoint: Endpoint,
}

/// Replica set member states reported in `members[].state`.
pub mod member_state {
    /// Member is primary.
    pub const PRIMARY: i64 = 1;
    /// Member is secondary.
    pub const SECONDARY: i64 = 2;
}

/// One member entry of a replica set description.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberInfo {
    /// Id of the member's server resource.
    pub server_id: String,
    /// `host:port` of the member.
    pub host: String,
    /// Replication state code.
    pub state: i64,
}

/// Description of a replica set.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicaSetInfo {
    /// Id and connection strings.
    #[serde(flatten)]
    pub endpoint: Endpoint,
    /// Members in configuration order.
    #[serde(default)]
    pub members: Vec<MemberInfo>,
}

/// A shard reference inside a sharded cluster description.
#[derive(Debug, Clone, Deserialize)]
pub struct ShardRef {
    /// Id of the replica set backing the shard.
    #[serde(rename = "_id")]
    pub id: String,
}

/// Description of a sharded cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct ShardedClusterInfo {
    /// Id and connection strings.
    #[serde(flatten)]
    pub endpoint: Endpoint,
    /// Shards in configuration order.
    #[serde(default)]
    pub shards: Vec<ShardRef>,
}

/// Settling intervals used when restarting a replica set primary.
///
/// The restart waits fixed amounts of time rather than polling for readiness,
/// so a slow host can still observe a stale primary afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartTiming {
    /// Wait after stopping the primary, giving the set time to elect.
    pub after_stop: Duration,
    /// Wait after starting the old primary again, before re-reading the set.
    pub after_start: Duration,
}

impl RestartTiming {
    /// No waiting at all.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            after_stop: Duration::ZERO,
            after_start: Duration::ZERO,
        }
    }
}

impl Default for RestartTiming {
    fn default() -> Self {
        Self {
            after_stop: Duration::from_secs(5),
            after_start: Duration::from_secs(1),
        }
    }
}

/// Outcome of a best-effort teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Resources deleted.
    pub deleted: usize,
    /// Listings or deletions that failed.
    pub failed: usize,
}
