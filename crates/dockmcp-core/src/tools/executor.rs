//! Tool dispatch

use crate::tools::registry::ToolRegistry;
use crate::tools::types::{ToolCall, ToolResult, ToolSchema};
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatches tool calls to registered tools
///
/// Holds no mutable state, so one executor can serve any number of
/// concurrent calls.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    /// Create an executor over a registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The registry this executor dispatches to
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Schemas of every tool, in advertisement order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.registry.schemas()
    }

    /// Execute a single tool call
    ///
    /// Always returns a result; unknown tools produce an error result.
    pub async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "Call to unknown tool");
            return ToolResult::error(
                &call.id,
                &call.name,
                format!("Tool '{}' not found", call.name),
            )
            .with_metadata("error_kind", "TOOL_NOT_FOUND");
        };

        info!(tool = %call.name, call_id = %call.id, "Dispatching tool call");
        let result = tool.execute_with_timing(call).await;

        if !result.success {
            info!(
                tool = %call.name,
                call_id = %call.id,
                error_kind = result.error_kind().unwrap_or("unknown"),
                "Tool call failed"
            );
        }

        result
    }

    /// Execute several calls concurrently, results in call order
    pub async fn execute_tools(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let futures: Vec<_> = calls.iter().map(|call| self.execute_tool(call)).collect();
        futures::future::join_all(futures).await
    }
}
