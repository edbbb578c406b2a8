//! Lumen - a local Ethereum-compatible devnet node.

use clap::Parser;
use eyre::Result;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose { "debug" } else { "info" })
        .init();

    tracing::info!("Starting lumen");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(cli.run())
}
