//! CLI argument definitions using clap
//!
//! - dockmcp                    # Serve MCP over stdio (default)
//! - dockmcp serve              # Same, explicitly
//! - dockmcp tools              # List the available tools

use clap::{Parser, Subcommand};
use dockmcp_core::ConfigOverrides;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dockmcp")]
#[command(about = "Model Context Protocol server for Docker container management")]
#[command(
    long_about = r#"Model Context Protocol server for Docker container management

USAGE:
  dockmcp                        # Serve MCP over stdin/stdout
  dockmcp tools                  # List available tools

Configuration is read from --config (TOML, YAML or JSON), then DOCKMCP_*
environment variables, then the flags below. Logs go to stderr."#
)]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Docker daemon address (unix://, npipe://, tcp:// or http://)
    #[arg(long, global = true)]
    pub docker_host: Option<String>,

    /// Docker request timeout in seconds
    #[arg(long, global = true)]
    pub docker_timeout: Option<u64>,

    /// Default exec_container timeout in seconds
    #[arg(long, global = true)]
    pub exec_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Serve the Docker tools over MCP on stdin/stdout
    #[default]
    Serve,

    /// List all available tools and their descriptions
    Tools,
}

impl Cli {
    /// Flag values that override the file and environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            docker_host: self.docker_host.clone(),
            docker_timeout_secs: self.docker_timeout,
            exec_timeout_secs: self.exec_timeout,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}
