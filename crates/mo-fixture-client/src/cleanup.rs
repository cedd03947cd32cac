//! Scoped teardown of everything launched during a run.

use std::future::Future;

use crate::client::OrchestrationClient;
use crate::error::ClientError;

/// Run `body`, then delete every deployment the service knows about.
///
/// Teardown runs whether `body` succeeds, fails, or is interrupted with
/// Ctrl-C; an interrupt resolves to `ClientError::Interrupted`. A forced kill
/// still leaves deployments behind.
///
/// # Errors
///
/// Returns the error produced by `body`, or `ClientError::Interrupted`.
pub async fn with_cleanup<T, E, Fut>(client: &OrchestrationClient, body: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: From<ClientError>,
{
    let outcome = tokio::select! {
        result = body => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, tearing down deployments");
            Err(E::from(ClientError::Interrupted))
        }
    };

    let summary = client.shutdown_all().await;
    tracing::info!(
        deleted = summary.deleted,
        failed = summary.failed,
        "Teardown finished"
    );

    outcome
}
