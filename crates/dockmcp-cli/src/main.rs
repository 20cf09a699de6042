//! dockmcp command-line entry point
//!
//! Serves the Docker tools to an MCP client over stdin/stdout.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/dockmcp-cli
//! ```
//!
//! Register the binary as a stdio server with any MCP client; `dockmcp tools`
//! prints what it exposes.

mod args;
mod commands;
mod logging;

use args::Cli;
use clap::Parser;
use dockmcp_core::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.overrides())?;
    logging::init(&config.logging)?;

    commands::route(cli.command.unwrap_or_default(), config).await
}
