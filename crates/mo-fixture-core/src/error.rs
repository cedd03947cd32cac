//! Common error types for mo-fixture.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while turning launcher input into a topology description.
#[derive(Debug, Error)]
pub enum CoreError {
    /// None of the argument words named a topology.
    #[error("no topology selected: expected one of single, repl, shard, shard3, shard4, mongos")]
    NoTopology,

    /// A TLS certificate directory could not be rendered as a path string.
    #[error("certificate path is not valid UTF-8: {0}")]
    InvalidCertPath(String),

    /// A request body could not be rendered as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
}
