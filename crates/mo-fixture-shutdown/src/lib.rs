//! Forced shutdown of a single running `mongod`.
//!
//! Connects straight to one node (no topology discovery) and runs
//! `{shutdown: 1, force: true}` against `admin`. A node that honors the
//! command usually drops the connection before replying, so a lost
//! connection counts as a normal outcome rather than an error.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::time::Duration;

use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::Client;
use thiserror::Error;

/// How long to wait for the node to become selectable.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// A result type using `ShutdownError`.
pub type Result<T> = std::result::Result<T, ShutdownError>;

/// Errors that abort the shutdown attempt.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The driver failed for a reason other than losing the connection.
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
}

/// What happened to the shutdown command.
#[derive(Debug, Clone, PartialEq)]
pub enum ShutdownOutcome {
    /// The node replied to the command.
    Acknowledged(Document),
    /// The node could not be reached or closed the connection.
    ConnectionLost(String),
}

/// Whether a driver error means the node is unreachable or went away.
#[must_use]
pub fn is_connection_failure(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. }
    )
}

/// Send a forced shutdown to the node at `host:port`.
///
/// # Errors
///
/// Returns `ShutdownError::Driver` for driver errors other than connection
/// failures, which are reported as `ShutdownOutcome::ConnectionLost`.
pub async fn shutdown_node(
    host: &str,
    port: u16,
    server_selection_timeout: Duration,
) -> Result<ShutdownOutcome> {
    let address = ServerAddress::parse(format!("{host}:{port}"))?;
    let options = ClientOptions::builder()
        .hosts(vec![address])
        .direct_connection(true)
        .server_selection_timeout(server_selection_timeout)
        .app_name("mo-shutdown".to_string())
        .build();
    let client = Client::with_options(options)?;

    tracing::debug!(host, port, "Sending shutdown");

    match client
        .database("admin")
        .run_command(doc! { "shutdown": 1, "force": true })
        .await
    {
        Ok(reply) => Ok(ShutdownOutcome::Acknowledged(reply)),
        Err(e) if is_connection_failure(&e) => {
            tracing::debug!(host, port, error = %e, "Connection lost during shutdown");
            Ok(ShutdownOutcome::ConnectionLost(e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
