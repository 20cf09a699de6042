//! create_container

use super::{container_text, port_keys};
use crate::runtime::{ContainerRuntime, ContainerSpec};
use crate::tools::failure::Failure;
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Creates a container without starting it
///
/// `cmd` is one shell-style string and `env` a comma-separated list, unlike
/// `run_container` which takes arrays for both.
pub struct CreateContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl CreateContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

fn split_env(env: &str) -> Vec<String> {
    env.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Tool for CreateContainerTool {
    fn name(&self) -> &str {
        "create_container"
    }

    fn description(&self) -> &str {
        "Create a Docker container"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("image", "Image name to use (e.g., \"ubuntu:22.04\")"),
                ToolParameter::optional_string("name", "Container name (optional)"),
                ToolParameter::optional_string(
                    "cmd",
                    "Command to run as space-separated string (optional, e.g., \"npm start\" or \"python app.py\")",
                ),
                ToolParameter::optional_string(
                    "env",
                    "Environment variables as comma-separated KEY=VALUE pairs (optional)",
                ),
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

        let cmd = match args.string("cmd").filter(|c| !c.trim().is_empty()) {
            Some(cmd) => Some(shell_words::split(cmd).map_err(|e| {
                ToolError::ValidationFailed(format!("Parameter 'cmd' could not be parsed: {}", e))
            })?),
            None => None,
        };

        let spec = ContainerSpec {
            name: name.map(str::to_string),
            image: image.to_string(),
            cmd,
            env: args
                .string("env")
                .filter(|e| !e.trim().is_empty())
                .map(split_env),
            exposed_ports: args.object("exposed_ports").map(port_keys),
            host_config: args.object("host_config").cloned().map(Value::Object),
        };

        let failure = Failure::new("creating container")
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

        Ok(container_text("created", &created))
    }
}
