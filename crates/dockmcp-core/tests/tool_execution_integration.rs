//! Integration tests for tool execution flow

use async_trait::async_trait;
use dockmcp_core::tools::{
    Tool, ToolArguments, ToolCall, ToolError, ToolExecutor, ToolParameter, ToolRegistryBuilder,
    ToolSchema,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// Mock container starter with a fixed set of known containers
struct StartTool;

#[async_trait]
impl Tool for StartTool {
    fn name(&self) -> &str {
        "start_container"
    }

    fn description(&self) -> &str {
        "Start a container"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("id", "Container ID or name")],
        )
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        match id {
            "web" | "db" => Ok(format!("Container {} started successfully", id)),
            _ => Err(ToolError::ResourceNotFound(format!("Container {} not found", id))),
        }
    }
}

// Mock log reader (read-only) exercising defaults and integer handling
struct LogsTool;

#[async_trait]
impl Tool for LogsTool {
    fn name(&self) -> &str {
        "fetch_container_logs"
    }

    fn description(&self) -> &str {
        "Fetch logs"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::boolean("stdout", "Include stdout").with_default(true),
                ToolParameter::integer("tail", "Lines from the end").optional(),
            ],
        )
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        Ok(format!(
            "id={} stdout={} tail={:?}",
            args.require_string("id")?,
            args.bool("stdout").unwrap_or(false),
            args.integer("tail")
        ))
    }

    fn is_read_only(&self) -> bool {
        true
    }
}

// Mock slow tool for concurrency checks
struct SleepTool;

#[async_trait]
impl Tool for SleepTool {
    fn name(&self) -> &str {
        "exec_container"
    }

    fn description(&self) -> &str {
        "Sleeps for the requested number of milliseconds"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::integer("millis", "How long to sleep")],
        )
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let millis = args.integer("millis").unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(millis as u64)).await;
        Ok(format!("slept {}", millis))
    }
}

fn executor() -> ToolExecutor {
    let registry = ToolRegistryBuilder::new()
        .with_tool(Arc::new(StartTool))
        .with_tool(Arc::new(LogsTool))
        .with_tool(Arc::new(SleepTool))
        .build()
        .unwrap();
    ToolExecutor::new(registry)
}

#[tokio::test]
async fn test_single_tool_execution() {
    let mut args = HashMap::new();
    args.insert("id".to_string(), json!("web"));

    let call = ToolCall::new("call_1", "start_container", args);
    let result = executor().execute_tool(&call).await;

    assert!(result.success);
    assert_eq!(result.tool_name, "start_container");
    assert_eq!(result.text(), "Container web started successfully");
    assert!(result.execution_time_ms.is_some());
}

#[tokio::test]
async fn test_resource_errors_keep_their_text() {
    let call = ToolCall::from_json("call_1", "start_container", json!({"id": "ghost"}));
    let result = executor().execute_tool(&call).await;

    assert!(!result.success);
    assert_eq!(result.text(), "Container ghost not found");
    assert_eq!(result.error_kind(), Some("TOOL_RESOURCE_NOT_FOUND"));
}

#[tokio::test]
async fn test_validation_runs_before_the_handler() {
    let executor = executor();

    let missing = ToolCall::from_json("1", "start_container", json!({}));
    let result = executor.execute_tool(&missing).await;
    assert_eq!(result.error_kind(), Some("TOOL_VALIDATION_FAILED"));
    assert!(result.text().contains("id"));

    let wrong_type = ToolCall::from_json("2", "start_container", json!({"id": 7}));
    let result = executor.execute_tool(&wrong_type).await;
    assert_eq!(result.error_kind(), Some("TOOL_VALIDATION_FAILED"));
    assert!(result.text().contains("must be of type string"));

    // null counts as absent
    let null = ToolCall::from_json("3", "start_container", json!({"id": null}));
    let result = executor.execute_tool(&null).await;
    assert_eq!(result.error_kind(), Some("TOOL_VALIDATION_FAILED"));
}

#[tokio::test]
async fn test_defaults_and_integral_floats() {
    let call = ToolCall::from_json(
        "1",
        "fetch_container_logs",
        json!({"id": "web", "tail": 5.0, "extra": "ignored"}),
    );
    let result = executor().execute_tool(&call).await;

    assert!(result.success);
    assert_eq!(result.text(), "id=web stdout=true tail=Some(5)");
}

#[tokio::test]
async fn test_unknown_tool_does_not_disturb_others() {
    let calls = vec![
        ToolCall::from_json("1", "start_container", json!({"id": "db"})),
        ToolCall::from_json("2", "delete_everything", json!({})),
        ToolCall::from_json("3", "fetch_container_logs", json!({"id": "db"})),
    ];

    let results = executor().execute_tools(&calls).await;
    assert_eq!(results.len(), 3);
    assert!(results[0].success);
    assert_eq!(results[1].error_kind(), Some("TOOL_NOT_FOUND"));
    assert!(results[2].success);
}

#[tokio::test]
async fn test_calls_run_concurrently() {
    let calls: Vec<ToolCall> = (0..4)
        .map(|i| ToolCall::from_json(i.to_string(), "exec_container", json!({"millis": 200})))
        .collect();

    let start = std::time::Instant::now();
    let results = executor().execute_tools(&calls).await;

    assert!(results.iter().all(|r| r.success));
    assert!(start.elapsed() < Duration::from_millis(700));
    let ids: Vec<&str> = results.iter().map(|r| r.call_id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "2", "3"]);
}

#[test]
fn test_read_only_flags() {
    let executor = executor();
    let read_only: Vec<&str> = executor
        .registry()
        .all_tools()
        .iter()
        .filter(|t| t.is_read_only())
        .map(|t| t.name())
        .collect();
    assert_eq!(read_only, vec!["fetch_container_logs"]);
}
