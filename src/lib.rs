//! dockmcp: Docker container management served over the Model Context Protocol
//!
//! The workspace is split into [`dockmcp_core`] (tool trait, validation,
//! registry, MCP server, configuration) and [`dockmcp_tools`] (the Docker
//! runtime facade and the 22 tools). This crate ties them together.
//!
//! ```no_run
//! use dockmcp::{DockerRuntime, ToolSettings, docker_server};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = DockerRuntime::connect(&Default::default())?;
//! let server = docker_server(Arc::new(runtime), ToolSettings::default())?;
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub use dockmcp_core::{
    DockmcpConfig, McpServer, McpServerInfo, Tool, ToolError, ToolExecutor, load_config,
};
pub use dockmcp_tools::{
    ContainerRuntime, CredentialStore, DockerRuntime, FakeRuntime, ToolSettings, docker_registry,
    docker_tools,
};

use std::sync::Arc;

/// MCP server exposing every Docker tool over `runtime`
pub fn docker_server(
    runtime: Arc<dyn ContainerRuntime>,
    settings: ToolSettings,
) -> Result<McpServer, ToolError> {
    let executor = ToolExecutor::new(docker_registry(runtime, settings)?);
    Ok(McpServer::new(McpServerInfo::default(), Arc::new(executor)))
}
