//! Serve command implementation

use super::build_executor;
use anyhow::{Context, Result};
use dockmcp_core::{DockmcpConfig, McpServer, McpServerInfo};
use std::sync::Arc;
use tracing::{info, warn};

/// Serve MCP over stdio until EOF or Ctrl-C
pub async fn serve(config: DockmcpConfig) -> Result<()> {
    let (runtime, executor) = build_executor(&config)?;

    if let Err(e) = runtime.ping().await {
        warn!(error = %e, "Docker daemon is not reachable; tool calls will fail until it is");
    }

    let server = McpServer::new(McpServerInfo::default(), Arc::new(executor));
    info!(
        name = %server.info().name,
        version = %server.info().version,
        exec_timeout_secs = config.exec.default_timeout_secs,
        "Serving MCP over stdio"
    );

    tokio::select! {
        result = server.serve_stdio() => {
            result.context("MCP server stopped with an error")?;
            info!("Input closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
