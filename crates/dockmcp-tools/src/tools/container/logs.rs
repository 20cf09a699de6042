//! fetch_container_logs

use crate::runtime::{ContainerRuntime, LogOptions};
use crate::tools::failure::{Failure, resolve_container};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct FetchContainerLogsTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl FetchContainerLogsTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for FetchContainerLogsTool {
    fn name(&self) -> &str {
        "fetch_container_logs"
    }

    fn description(&self) -> &str {
        "Fetch Docker container logs"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::boolean("stdout", "Include stdout (default: true)")
                    .optional()
                    .with_default(true),
                ToolParameter::boolean("stderr", "Include stderr (default: true)")
                    .optional()
                    .with_default(true),
                ToolParameter::integer(
                    "tail",
                    "Number of lines to show from the end of logs (default: all)",
                )
                .optional(),
                ToolParameter::boolean("timestamps", "Show timestamps (default: false)")
                    .optional()
                    .with_default(false),
            ],
        )
    }

    fn is_read_only(&self) -> bool {
        true
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let tail = args.integer("tail");
        if tail.is_some_and(|n| n < 0) {
            return Err(ToolError::ValidationFailed(
                "Parameter 'tail' must not be negative".to_string(),
            ));
        }

        let options = LogOptions {
            stdout: args.require_bool("stdout")?,
            stderr: args.require_bool("stderr")?,
            timestamps: args.require_bool("timestamps")?,
            tail,
        };
        let failure =
            Failure::new("fetching logs").not_found(format!("Container {} not found", id));

        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;
        self.runtime
            .container_logs(&container.id, options)
            .await
            .map_err(|e| failure.map(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ContainerDetails, FakeRuntime, MockContainerRuntime};
    use crate::tools::test_support::call;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_forwarded() {
        let mut mock = MockContainerRuntime::new();
        mock.expect_inspect_container().returning(|id| {
            Ok(ContainerDetails {
                id: id.to_string(),
                ..ContainerDetails::default()
            })
        });
        mock.expect_container_logs()
            .withf(|id, options| id == "web" && *options == LogOptions::default())
            .returning(|_, _| Ok("ready\n".into()));

        let result = call(&FetchContainerLogsTool::new(Arc::new(mock)), json!({"id": "web"})).await;
        assert_eq!(result.text(), "ready\n");
    }

    #[tokio::test]
    async fn test_tail_and_streams() {
        let runtime = FakeRuntime::new().with_image("alpine");
        let tool = FetchContainerLogsTool::new(Arc::new(runtime.clone()));
        let spec = crate::runtime::ContainerSpec {
            name: Some("web".into()),
            image: "alpine".into(),
            ..Default::default()
        };
        runtime.create_container(spec).await.unwrap();
        for (stderr, line) in [(false, "a"), (true, "warn"), (false, "b"), (false, "c")] {
            runtime.add_log("web", stderr, line).unwrap();
        }

        let result = call(&tool, json!({"id": "web", "tail": 2, "stderr": false})).await;
        assert_eq!(result.text(), "b\nc\n");

        let result = call(&tool, json!({"id": "web", "tail": -1})).await;
        assert_eq!(result.error_kind(), Some("TOOL_VALIDATION_FAILED"));

        let result = call(&tool, json!({"id": "nope"})).await;
        assert_eq!(result.text(), "Container nope not found");
    }
}
