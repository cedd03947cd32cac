//! Error types for orchestration requests and deployment lifecycle operations.

use thiserror::Error;

use crate::resource::Resource;

/// A result type using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while driving mongo-orchestration.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service rejected a request, either with a non-success status or
    /// with an array-shaped error body.
    #[error("{method} {url} failed ({status}): {body}")]
    Request {
        /// HTTP method of the failed request.
        method: &'static str,
        /// Full request URL.
        url: String,
        /// HTTP status code returned by the service.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The deployment has not been started, so it has no id yet.
    #[error("{0} has not been started")]
    NotStarted(Resource),

    /// The replica set has no known primary.
    #[error("replica set {0} has no primary")]
    NoPrimary(String),

    /// The operation is not available for this kind of deployment.
    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        /// Operation that was requested.
        operation: &'static str,
        /// Resource kind it was requested on.
        resource: Resource,
    },

    /// The request body could not be built.
    #[error(transparent)]
    Core(#[from] mo_fixture_core::CoreError),

    /// The operator interrupted the run.
    #[error("interrupted")]
    Interrupted,
}

impl ClientError {
    /// Returns the HTTP status for errors reported by the service.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
