//! Subcommand implementations

pub mod serve;
pub mod tools;

use crate::args::Commands;
use anyhow::{Context, Result};
use dockmcp_core::tools::ToolExecutor;
use dockmcp_core::{DockmcpConfig, ToolRegistry};
use dockmcp_tools::{CredentialStore, DockerRuntime, ToolSettings, docker_registry};
use std::sync::Arc;

/// Run the selected subcommand
pub async fn route(command: Commands, config: DockmcpConfig) -> Result<()> {
    match command {
        Commands::Serve => serve::serve(config).await,
        Commands::Tools => tools::show_tools(&config),
    }
}

/// Docker client plus the registry of tools bound to it
pub(crate) fn build_registry(config: &DockmcpConfig) -> Result<(Arc<DockerRuntime>, ToolRegistry)> {
    let runtime = Arc::new(
        DockerRuntime::connect(&config.docker).context("Failed to configure the Docker client")?,
    );
    let settings = ToolSettings {
        exec_timeout_secs: config.exec.default_timeout_secs,
        credentials: CredentialStore::from_env(),
    };
    let registry = docker_registry(runtime.clone(), settings)?;
    Ok((runtime, registry))
}

pub(crate) fn build_executor(config: &DockmcpConfig) -> Result<(Arc<DockerRuntime>, ToolExecutor)> {
    let (runtime, registry) = build_registry(config)?;
    Ok((runtime, ToolExecutor::new(registry)))
}
