//! run_container

use super::{container_text, port_keys};
use crate::runtime::{ContainerRuntime, ContainerSpec};
use crate::tools::failure::Failure;
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Creates and starts a container
pub struct RunContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RunContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RunContainerTool {
    fn name(&self) -> &str {
        "run_container"
    }

    fn description(&self) -> &str {
        "Run a Docker container (create and start)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("image", "Image name to use (e.g., \"ubuntu:22.04\")"),
                ToolParameter::optional_string("name", "Container name (optional)"),
                ToolParameter::string_array("cmd", "Command to run (optional)").optional(),
                ToolParameter::string_array("env", "Environment variables as KEY=VALUE (optional)")
                    .optional(),
                ToolParameter::object(
                    "exposed_ports",
                    "Exposed ports as {\"port/protocol\": {}} (optional)",
                )
                .optional(),
                ToolParameter::object(
                    "host_config",
                    "Host configuration including port bindings, volumes, etc. (optional)",
                )
                .optional(),
            ],
        )
    }

    #[instrument(skip(self, args), fields(image = args.string("image").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let image = args.require_string("image")?;
        let name = args.string("name");

        let spec = ContainerSpec {
            name: name.map(str::to_string),
            image: image.to_string(),
            cmd: args.string_list("cmd"),
            env: args.string_list("env"),
            exposed_ports: args.object("exposed_ports").map(port_keys),
            host_config: args.object("host_config").cloned().map(Value::Object),
        };

        let failure = Failure::new("running container")
            .not_found(format!("Image {} not found", image))
            .conflict(format!(
                "Container with name {} already exists",
                name.unwrap_or_default()
            ));
        let created = self
            .runtime
            .create_container(spec)
            .await
            .map_err(|e| failure.map(e))?;

        debug!(id = %created.id, "Starting new container");
        // A start failure leaves the created container in place
        self.runtime
            .start_container(&created.id)
            .await
            .map_err(|e| Failure::new("running container").map(e))?;

        Ok(container_text("started", &created))
    }
}
