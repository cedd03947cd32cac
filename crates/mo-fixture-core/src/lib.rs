//! Core types for mo-fixture.
//!
//! This crate describes the deployments that mongo-orchestration can build for
//! a test run, without talking to the service itself:
//!
//! - **Process parameters**: per-process option maps merged over a default set,
//!   each carrying a port drawn from a [`PortAllocator`]
//! - **Topologies**: the [`TopologyKind`] selector and the [`ConfigBuilder`]
//!   that turns it into a request body
//! - **Request template**: credentials, TLS material and version pin merged
//!   into every create request
//!
//! # Example
//!
//! ```
//! use mo_fixture_core::{ConfigBuilder, PortAllocator, ReplicaSetShape, TopologyKind};
//!
//! let mut builder = ConfigBuilder::new(PortAllocator::new(27017));
//! let config = builder.build(TopologyKind::ReplicaSet(ReplicaSetShape::Three));
//!
//! assert_eq!(config.ports(), vec![27017, 27018, 27019]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod params;
pub mod ports;
pub mod request;
pub mod topology;

pub use error::{CoreError, Result};
pub use params::{default_options, ProcessParams};
pub use ports::{PortAllocator, DEFAULT_START_PORT};
pub use request::{Credentials, RequestTemplate, TlsParams, SUPPORTED_VERSIONS};
pub use topology::{
    ConfigBuilder, MemberConfig, ReplicaSetConfig, ReplicaSetShape, RsParams, ServerConfig,
    ShardConfig, ShardedClusterConfig, TopologyConfig, TopologyKind, ROUTERS_PER_CLUSTER,
};
