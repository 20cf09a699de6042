//! recreate_container

use super::lifecycle::DEFAULT_STOP_TIMEOUT_SECS;
use crate::runtime::{ContainerRuntime, RemoveContainerOptions};
use crate::tools::failure::{Failure, resolve_container};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Replaces a container with a fresh one built from the same configuration
///
/// The configuration is captured before anything destructive happens. The
/// sequence is not atomic: a failure after removal leaves no container.
pub struct RecreateContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RecreateContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RecreateContainerTool {
    fn name(&self) -> &str {
        "recreate_container"
    }

    fn description(&self) -> &str {
        "Recreate a Docker container (stops, removes, and recreates with same configuration)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name to recreate"),
                ToolParameter::integer(
                    "timeout",
                    "Seconds to wait before killing the container when stopping (default: 10)",
                )
                .optional()
                .with_default(DEFAULT_STOP_TIMEOUT_SECS),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let timeout = args.require_integer("timeout")?;
        let failure = Failure::new("recreating container")
            .not_found(format!("Container {} not found", id));

        let snapshot = resolve_container(self.runtime.as_ref(), id, &failure).await?;
        let map = |e| failure.map(e);

        if snapshot.running {
            debug!(container = %snapshot.id, "Stopping before recreate");
            self.runtime
                .stop_container(&snapshot.id, timeout)
                .await
                .map_err(map)?;
        }
        self.runtime
            .remove_container(&snapshot.id, RemoveContainerOptions::default())
            .await
            .map_err(map)?;

        let created = self
            .runtime
            .create_container(snapshot.to_spec())
            .await
            .map_err(map)?;
        if snapshot.running {
            self.runtime
                .start_container(&created.id)
                .await
                .map_err(map)?;
        }

        Ok(format!(
            "Container {} recreated successfully. New ID: {}",
            id, created.id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ContainerSpec, FakeRuntime};
    use crate::tools::test_support::call;
    use serde_json::json;

    fn spec() -> ContainerSpec {
        ContainerSpec {
            name: Some("web".into()),
            image: "nginx:1.27".into(),
            cmd: Some(vec!["nginx".into(), "-g".into(), "daemon off;".into()]),
            env: Some(vec!["MODE=prod".into()]),
            exposed_ports: Some(vec!["80/tcp".into()]),
            host_config: Some(json!({"Memory": 268435456})),
        }
    }

    #[tokio::test]
    async fn test_running_container_is_stopped_and_restarted() {
        let runtime = FakeRuntime::new().with_image("nginx:1.27");
        let old = runtime.create_container(spec()).await.unwrap();
        runtime.start_container("web").await.unwrap();

        let tool = RecreateContainerTool::new(Arc::new(runtime.clone()));
        let result = call(&tool, json!({"id": "web", "timeout": 3})).await;
        assert!(result.success, "{:?}", result.error);

        let new = runtime.inspect_container("web").await.unwrap();
        assert_ne!(new.id, old.id);
        assert!(new.running);
        assert_eq!(new.to_spec(), spec());
        assert_eq!(
            result.text(),
            format!("Container web recreated successfully. New ID: {}", new.id)
        );

        let ops = runtime.operations();
        let tail: Vec<&str> = ops[ops.len() - 4..]
            .iter()
            .map(|op| op.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(tail, vec!["stop", "remove", "create", "start"]);
    }

    #[tokio::test]
    async fn test_stopped_container_stays_stopped() {
        let runtime = FakeRuntime::new().with_image("nginx:1.27");
        runtime.create_container(spec()).await.unwrap();

        let tool = RecreateContainerTool::new(Arc::new(runtime.clone()));
        assert!(call(&tool, json!({"id": "web"})).await.success);

        let new = runtime.inspect_container("web").await.unwrap();
        assert!(!new.running);
        assert!(!runtime.operations().iter().any(|op| op.starts_with("stop:")));
    }

    #[tokio::test]
    async fn test_missing_container() {
        let tool = RecreateContainerTool::new(Arc::new(FakeRuntime::new()));
        let result = call(&tool, json!({"id": "ghost"})).await;
        assert_eq!(result.text(), "Container ghost not found");
    }
}
