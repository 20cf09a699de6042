//! Core Tool trait definition

use super::error::ToolError;
use crate::tools::types::{ToolCall, ToolResult, ToolSchema};
use crate::tools::validation::{ToolArguments, validate_call};
use async_trait::async_trait;
use std::time::Instant;

/// Base trait for all tools
///
/// A tool declares its parameters through [`Tool::schema`] and receives only
/// arguments that already passed validation against that schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's unique name (e.g., "start_container")
    fn name(&self) -> &str;

    /// Get the tool's description for the calling agent
    fn description(&self) -> &str;

    /// Get the tool's declared parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with validated arguments
    ///
    /// # Errors
    ///
    /// Returns `ToolError` classified by what went wrong: a missing resource,
    /// a name conflict, rejected credentials, a timeout, or any other failure.
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError>;

    /// Whether this tool only reads data without side effects
    fn is_read_only(&self) -> bool {
        false
    }

    /// Validate and execute the call, always producing a result
    ///
    /// Execution flow:
    /// 1. Validates arguments against `schema()`
    /// 2. Executes the tool using `execute()`
    /// 3. Measures execution time
    /// 4. Converts errors to `ToolResult::error` tagged with `error_kind`
    async fn execute_with_timing(&self, call: &ToolCall) -> ToolResult {
        let start_time = Instant::now();

        let outcome = match validate_call(&self.schema(), call) {
            Ok(args) => self.execute(&args).await,
            Err(err) => Err(err),
        };

        let elapsed = start_time.elapsed().as_millis() as u64;
        match outcome {
            Ok(output) => {
                ToolResult::success(&call.id, self.name(), output).with_execution_time(elapsed)
            }
            Err(err) => ToolResult::error(&call.id, self.name(), err.to_string())
                .with_metadata("error_kind", err.error_code())
                .with_execution_time(elapsed),
        }
    }
}
