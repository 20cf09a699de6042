//! start_container, stop_container and remove_container

use crate::runtime::{ContainerRuntime, RemoveContainerOptions};
use crate::tools::failure::{Failure, resolve_container};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

/// Default grace period before a stopped container is killed
pub(crate) const DEFAULT_STOP_TIMEOUT_SECS: i64 = 10;

fn not_found(operation: &'static str, id: &str) -> Failure {
    Failure::new(operation).not_found(format!("Container {} not found", id))
}

pub struct StartContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl StartContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for StartContainerTool {
    fn name(&self) -> &str {
        "start_container"
    }

    fn description(&self) -> &str {
        "Start a Docker container"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("id", "Container ID or name")],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let failure = not_found("starting container", id);

        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;
        self.runtime
            .start_container(&container.id)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Container {} started successfully", id))
    }
}

pub struct StopContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl StopContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for StopContainerTool {
    fn name(&self) -> &str {
        "stop_container"
    }

    fn description(&self) -> &str {
        "Stop a Docker container"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::integer(
                    "timeout",
                    "Seconds to wait before killing the container (default: 10)",
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
        let failure = not_found("stopping container", id);

        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;
        self.runtime
            .stop_container(&container.id, timeout)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Container {} stopped successfully", id))
    }
}

pub struct RemoveContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RemoveContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RemoveContainerTool {
    fn name(&self) -> &str {
        "remove_container"
    }

    fn description(&self) -> &str {
        "Remove a Docker container"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::boolean(
                    "force",
                    "Force removal of running container (default: false)",
                )
                .optional()
                .with_default(false),
                ToolParameter::boolean("volumes", "Remove associated volumes (default: false)")
                    .optional()
                    .with_default(false),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let options = RemoveContainerOptions {
            force: args.require_bool("force")?,
            volumes: args.require_bool("volumes")?,
        };
        let failure = not_found("removing container", id);

        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;
        self.runtime
            .remove_container(&container.id, options)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Container {} removed successfully", id))
    }
}
