//! Binary crate for the `weather` tool.
//!
//! This crate focuses on:
//! - The interactive terminal weather screen
//! - Parsing CLI arguments and interactive configuration
//! - Logging setup

use clap::Parser;

mod app;
mod cli;
mod logging;
mod search_input;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
