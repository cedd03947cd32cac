//! Resource collections exposed by mongo-orchestration.

use std::fmt;

use serde::Serialize;

/// A top-level collection in the orchestration REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `/servers`
    Servers,
    /// `/replica_sets`
    ReplicaSets,
    /// `/sharded_clusters`
    ShardedClusters,
}

impl Resource {
    /// Collections in teardown order: clusters before the sets and servers they own.
    pub const TEARDOWN_ORDER: [Self; 3] = [Self::ShardedClusters, Self::ReplicaSets, Self::Servers];

    /// Path segment (and listing key) of this collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::ReplicaSets => "replica_sets",
            Self::ShardedClusters => "sharded_clusters",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a start/stop action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Start a stopped process.
    Start,
    /// Stop the process but keep its orchestration record.
    Stop,
}
