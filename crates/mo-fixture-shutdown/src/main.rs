//! mo-shutdown - force one mongod to shut down.
//!
//! Exits non-zero only when the driver fails for a reason other than a lost
//! or refused connection.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mo_fixture_shutdown::{shutdown_node, ShutdownOutcome};

/// Send `{shutdown: 1, force: true}` to a running node.
#[derive(Parser, Debug)]
#[command(name = "mo-shutdown")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port of the node.
    port: u16,

    /// Host of the node.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server selection timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    server_selection_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let timeout = std::time::Duration::from_millis(args.server_selection_timeout_ms);
    match shutdown_node(&args.host, args.port, timeout).await {
        Ok(ShutdownOutcome::Acknowledged(reply)) => println!("{reply}"),
        Ok(ShutdownOutcome::ConnectionLost(message)) => println!("{message}"),
        Err(e) => {
            println!("{e}");
            return Err(e.into());
        }
    }

    println!("\n*******exiting");
    Ok(())
}
