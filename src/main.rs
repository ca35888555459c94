mod cli;
mod commands;
mod config;
mod error;
mod graph;
mod index;
mod maintenance;
mod package_manager;
mod report;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    commands::run(cli).await?;

    Ok(())
}
