//! SolRig harness binary
//!
//! Deploys a contract to a running simulator node, replays a directive
//! sequence against the deployed instance, and writes two artifacts: the
//! per-directive execution traces and the per-directive status markers.
//!
//! ## Usage
//!
//! ```bash
//! solrig --abi contract.abi.json --bytecode contract.bin \
//!        --directives tests.json --rpc-url http://localhost:8545
//! ```

mod cli;
mod config;
mod error;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::Config;
use error::CliError;
use solrig_client::abi::ContractArtifact;
use solrig_client::LedgerClient;
use solrig_runner::{DirectiveQueue, OutputSink, Runner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = resolve_config(&cli)?;

    let artifact = ContractArtifact::from_files(&cli.abi, &cli.bytecode)
        .context("loading contract artifact")?;
    let queue = DirectiveQueue::load_file(&cli.directives).context("loading directives")?;

    tracing::info!(
        "starting a new round of tests: {} directives against {}",
        queue.len(),
        config.rpc_url
    );

    let client = LedgerClient::connect(&config.rpc_url);
    let runner = Runner::new(client, artifact);
    let output = runner.run(&queue).await.context("test run aborted")?;

    let sink = OutputSink::new(&config.traces_out, &config.statuses_out);
    sink.flush(&output).context("writing output artifacts")?;

    tracing::info!(
        "wrote {} traces to {} and {} statuses to {}",
        output.traces.len(),
        config.traces_out.display(),
        output.statuses.len(),
        config.statuses_out.display()
    );

    Ok(())
}

/// File config with CLI flags layered on top
fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(path) = &cli.traces_out {
        config.traces_out = path.clone();
    }
    if let Some(path) = &cli.statuses_out {
        config.statuses_out = path.clone();
    }
    Ok(config)
}
