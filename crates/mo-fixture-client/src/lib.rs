//! mongo-orchestration client for launching test deployments.
//!
//! This crate sends the configurations built by `mo-fixture-core` to a running
//! mongo-orchestration service and keeps track of what it reports back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                mo-launch (interactive CLI)                │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  with_cleanup ─▶ Deployment (Server | ReplicaSet | Shard) │
//! │                        │ start / stop / restart_primary   │
//! │                        ▼                                  │
//! │               OrchestrationClient (reqwest)               │
//! └──────────────────────────────────────────────────────────┘
//!                              │ HTTP/JSON
//!                              ▼
//!                   mongo-orchestration service
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use mo_fixture_client::{with_cleanup, ClientError, Deployment, OrchestrationClient};
//! use mo_fixture_core::{ConfigBuilder, PortAllocator, ReplicaSetShape, RequestTemplate, TopologyKind};
//!
//! # async fn example() -> Result<(), ClientError> {
//! let client = OrchestrationClient::new("localhost:8889", RequestTemplate::default());
//! let config = ConfigBuilder::new(PortAllocator::new(27017))
//!     .build(TopologyKind::ReplicaSet(ReplicaSetShape::Three));
//! let mut deployment = Deployment::from(config);
//!
//! with_cleanup(&client, async {
//!     deployment.start(&client).await?;
//!     println!("{}", deployment.uri().unwrap_or_default());
//!     Ok::<_, ClientError>(())
//! })
//! .await
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cleanup;
pub mod client;
pub mod deployment;
pub mod error;
pub mod resource;
pub mod types;

pub use cleanup::with_cleanup;
pub use client::{OrchestrationClient, DEFAULT_ADDRESS};
pub use deployment::{Deployment, ReplicaSet, Server, ShardedCluster};
pub use error::{ClientError, Result};
pub use resource::{Action, Resource};
pub use types::{CleanupSummary, Endpoint, RestartTiming};
