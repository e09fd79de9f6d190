//! Nebo: Slack slash commands backed by Salesforce account data.
//!
//! Serves `/nebo` account lookups plus the `/feature` and `/meet` helpers,
//! and can run a single lookup from the terminal.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
