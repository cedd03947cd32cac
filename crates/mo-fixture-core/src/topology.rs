//! Topology selection and the request bodies mongo-orchestration expects for each.
//!
//! Shapes are plain data: a [`TopologyKind`] picks the shape and the
//! [`ConfigBuilder`] fills in process parameters, drawing one port per process.
//!
//! ```text
//! Standalone                     {"name": "mongod", "procParams": {..}}
//! ReplicaSet(Three)              {"members": [{procParams}, {procParams}, {rsParams, procParams}]}
//! ShardedCluster{shards: 4, ..}  {"routers": [p, p], "shards": [{"id", "shardParams": <replica set>}; 4]}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::params::{default_options, ProcessParams};
use crate::ports::PortAllocator;

/// Number of `mongos` routers placed in front of every sharded cluster.
pub const ROUTERS_PER_CLUSTER: usize = 2;

/// Member layout of a replica set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaSetShape {
    /// A single member, which becomes primary.
    Single,
    /// Three data-bearing members.
    Three,
}

impl ReplicaSetShape {
    /// Number of members this shape launches.
    #[must_use]
    pub const fn members(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Three => 3,
        }
    }
}

/// The deployment to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    /// One standalone `mongod`.
    Standalone,
    /// A replica set.
    ReplicaSet(ReplicaSetShape),
    /// A sharded cluster whose shards are all replica sets of the same shape.
    ShardedCluster {
        /// Number of shards.
        shards: usize,
        /// Layout of every shard.
        shard_shape: ReplicaSetShape,
    },
}

impl TopologyKind {
    /// Total number of processes (routers included) this kind launches.
    #[must_use]
    pub const fn process_count(self) -> usize {
        match self {
            Self::Standalone => 1,
            Self::ReplicaSet(shape) => shape.members(),
            Self::ShardedCluster {
                shards,
                shard_shape,
            } => ROUTERS_PER_CLUSTER + shards * shard_shape.members(),
        }
    }
}

/// Request body for a standalone server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    /// Binary to launch.
    pub name: String,
    /// Process options.
    #[serde(rename = "procParams")]
    pub proc_params: ProcessParams,
}

/// Replica set member options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RsParams {
    /// Whether the member is an arbiter.
    #[serde(rename = "arbiterOnly")]
    pub arbiter_only: bool,
}

/// One replica set member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberConfig {
    /// Member options, omitted for plain members.
    #[serde(rename = "rsParams", skip_serializing_if = "Option::is_none")]
    pub rs_params: Option<RsParams>,
    /// Process options.
    #[serde(rename = "procParams")]
    pub proc_params: ProcessParams,
}

/// Request body for a replica set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicaSetConfig {
    /// Members in launch order.
    pub members: Vec<MemberConfig>,
}

/// One shard of a sharded cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardConfig {
    /// Shard name.
    pub id: String,
    /// The replica set backing this shard.
    #[serde(rename = "shardParams")]
    pub shard_params: ReplicaSetConfig,
}

/// Request body for a sharded cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardedClusterConfig {
    /// `mongos` router options.
    pub routers: Vec<ProcessParams>,
    /// Shards in launch order.
    pub shards: Vec<ShardConfig>,
}

/// A fully built request body for any topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopologyConfig {
    /// Standalone server.
    Server(ServerConfig),
    /// Replica set.
    ReplicaSet(ReplicaSetConfig),
    /// Sharded cluster.
    ShardedCluster(ShardedClusterConfig),
}

impl TopologyConfig {
    /// Every process-parameter block, in port order.
    #[must_use]
    pub fn process_params(&self) -> Vec<&ProcessParams> {
        match self {
            Self::Server(server) => vec![&server.proc_params],
            Self::ReplicaSet(rs) => rs.members.iter().map(|m| &m.proc_params).collect(),
            Self::ShardedCluster(cluster) => cluster
                .routers
                .iter()
                .chain(
                    cluster
                        .shards
                        .iter()
                        .flat_map(|shard| shard.shard_params.members.iter())
                        .map(|m| &m.proc_params),
                )
                .collect(),
        }
    }

    /// Ports assigned to the processes, in launch order.
    #[must_use]
    pub fn ports(&self) -> Vec<u16> {
        self.process_params()
            .into_iter()
            .filter_map(ProcessParams::port)
            .collect()
    }

    /// Render the request body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialize` if the configuration cannot be encoded.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Builds request bodies, assigning each process the next free port.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    defaults: Map<String, Value>,
    overrides: Map<String, Value>,
    ports: PortAllocator,
}

impl ConfigBuilder {
    /// Create a builder using the standard default options.
    #[must_use]
    pub fn new(ports: PortAllocator) -> Self {
        Self {
            defaults: default_options(),
            overrides: Map::new(),
            ports,
        }
    }

    /// Replace the default option set.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set options applied over the defaults for every process.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Access the port allocator, e.g. to reseed it between builds.
    pub fn ports_mut(&mut self) -> &mut PortAllocator {
        &mut self.ports
    }

    /// Build parameters for one process.
    pub fn proc_params(&mut self) -> ProcessParams {
        let port = self.ports.next_port();
        ProcessParams::new(&self.defaults, &self.overrides, port)
    }

    /// Build a standalone server config.
    pub fn server(&mut self) -> ServerConfig {
        ServerConfig {
            name: "mongod".to_string(),
            proc_params: self.proc_params(),
        }
    }

    /// Build a replica set config of the given shape.
    pub fn replica_set(&mut self, shape: ReplicaSetShape) -> ReplicaSetConfig {
        let mut members = vec![MemberConfig {
            rs_params: None,
            proc_params: self.proc_params(),
        }];

        if shape == ReplicaSetShape::Three {
            members.push(MemberConfig {
                rs_params: None,
                proc_params: self.proc_params(),
            });
            members.push(MemberConfig {
                rs_params: Some(RsParams {
                    arbiter_only: false,
                }),
                proc_params: self.proc_params(),
            });
        }

        ReplicaSetConfig { members }
    }

    /// Build a sharded cluster config: routers first, then each shard.
    pub fn sharded_cluster(
        &mut self,
        shards: usize,
        shard_shape: ReplicaSetShape,
    ) -> ShardedClusterConfig {
        let routers = (0..ROUTERS_PER_CLUSTER)
            .map(|_| self.proc_params())
            .collect();

        let shards = (0..shards)
            .map(|n| ShardConfig {
                id: format!("demo-set-{n}"),
                shard_params: self.replica_set(shard_shape),
            })
            .collect();

        ShardedClusterConfig { routers, shards }
    }

    /// Build the request body for `kind`.
    pub fn build(&mut self, kind: TopologyKind) -> TopologyConfig {
        match kind {
            TopologyKind::Standalone => TopologyConfig::Server(self.server()),
            TopologyKind::ReplicaSet(shape) => TopologyConfig::ReplicaSet(self.replica_set(shape)),
            TopologyKind::ShardedCluster {
                shards,
                shard_shape,
            } => TopologyConfig::ShardedCluster(self.sharded_cluster(shards, shard_shape)),
        }
    }
}
