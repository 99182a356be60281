//! Articlecast CLI: one query in, one summarized Telegram post out.
//!
//! Derives search keywords with a local model, collects Wikipedia and Medium
//! articles, summarizes them, and publishes the digest to a channel.

mod commands;

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
