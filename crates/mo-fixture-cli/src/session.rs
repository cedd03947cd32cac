//! Interactive command loop run while a deployment is up.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use mo_fixture_client::{ClientError, Deployment, OrchestrationClient, RestartTiming, Server};

const PROMPT: &str = r#"Type "q" to quit, "r" to shutdown and restart the primary: "#;

/// An operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tear down and exit.
    Quit,
    /// Stop the replica set primary and start it again.
    RestartPrimary,
    /// Anything else; ignored.
    Unknown,
}

impl Command {
    /// Parse one input line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "q" => Self::Quit,
            "r" => Self::RestartPrimary,
            _ => Self::Unknown,
        }
    }
}

/// Read commands from `input` until `q` or end of input.
///
/// # Errors
///
/// Returns an error if reading input fails or a restart request fails.
/// Restarting on a deployment without a primary only reports the problem.
pub async fn run<R>(
    input: R,
    deployment: &mut Deployment,
    client: &OrchestrationClient,
    timing: RestartTiming,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };

        match Command::parse(&line) {
            Command::Quit => return Ok(()),
            Command::RestartPrimary => match deployment.restart_primary(client, timing).await {
                Ok(()) => {
                    println!("New primary: {}", primary_uri(deployment).unwrap_or("<none>"));
                }
                Err(e @ (ClientError::Unsupported { .. } | ClientError::NoPrimary(_))) => {
                    tracing::warn!(error = %e, "Cannot restart primary");
                    println!("{e}");
                }
                Err(e) => return Err(e.into()),
            },
            Command::Unknown => {}
        }
    }
}

fn primary_uri(deployment: &Deployment) -> Option<&str> {
    match deployment {
        Deployment::ReplicaSet(rs) => rs.primary().and_then(Server::uri),
        _ => None,
    }
}
