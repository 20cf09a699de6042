//! Helpers for handler tests

use dockmcp_core::tools::{Tool, ToolCall, ToolResult};
use serde_json::Value;

/// Validate and run one call the way the dispatcher does
pub(crate) async fn call(tool: &dyn Tool, arguments: Value) -> ToolResult {
    let call = ToolCall::from_json("test-call", tool.name(), arguments);
    tool.execute_with_timing(&call).await
}
