//! mo-launch - launch a MongoDB deployment through mongo-orchestration.
//!
//! Requires mongo-orchestration listening on `MO_ADDRESS` (default `localhost:8889`).
//!
//! ```text
//! mo-launch single             # standalone mongod
//! mo-launch single auth ssl    # standalone with auth and TLS
//! mo-launch repl               # three-member replica set
//! mo-launch repl single auth   # one-member replica set with auth
//! mo-launch shard              # sharded cluster, one single-member shard
//! mo-launch shard4 28000       # four three-member shards, ports from 28000
//! ```
//!
//! Everything the service knows about is deleted on exit, including on error
//! and Ctrl-C.

mod config;
mod runtime;
mod selection;
mod session;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mo_fixture_client::{with_cleanup, Deployment, OrchestrationClient, RestartTiming};
use mo_fixture_core::{ConfigBuilder, PortAllocator};

use config::{Args, LaunchConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug {
        "info,mo_launch=debug,mo_fixture_client=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    runtime::block_on_detached(launch(&args))?
}

async fn launch(args: &Args) -> anyhow::Result<()> {
    let config = LaunchConfig::from_args(args)?;
    tracing::info!(
        address = %config.address,
        kind = ?config.kind,
        start_port = config.start_port,
        "Launching deployment"
    );

    let client = OrchestrationClient::new(&config.address, config.template.clone());
    let mut builder = ConfigBuilder::new(PortAllocator::new(config.start_port));
    let mut deployment = Deployment::from(builder.build(config.kind));

    with_cleanup(&client, async {
        deployment.start(&client).await?;
        println!(
            "{} {} ready at {}",
            deployment.resource(),
            deployment.id().unwrap_or_default(),
            deployment.uri().unwrap_or_default()
        );

        let stdin = BufReader::new(tokio::io::stdin());
        session::run(stdin, &mut deployment, &client, RestartTiming::default()).await?;

        deployment.stop(&client, true).await?;
        Ok::<_, anyhow::Error>(())
    })
    .await
}
