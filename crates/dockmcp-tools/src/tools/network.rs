//! Network tools

use crate::runtime::{ContainerRuntime, NetworkSpec};
use crate::tools::failure::{Failure, pretty_json, resolve_network};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct CreateNetworkTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl CreateNetworkTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for CreateNetworkTool {
    fn name(&self) -> &str {
        "create_network"
    }

    fn description(&self) -> &str {
        "Create a Docker network"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("name", "Name of the network"),
                ToolParameter::string("driver", "Driver to use (default: bridge)")
                    .optional()
                    .with_default("bridge"),
                ToolParameter::boolean(
                    "check_duplicate",
                    "Check for networks with duplicate names (default: true)",
                )
                .optional()
                .with_default(true),
            ],
        )
    }

    #[instrument(skip(self, args), fields(name = args.string("name").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let name = args.require_string("name")?;
        let spec = NetworkSpec {
            name: name.to_string(),
            driver: args.require_string("driver")?.to_string(),
            check_duplicate: args.require_bool("check_duplicate")?,
        };
        let failure =
            Failure::new("creating network").conflict(format!("Network {} already exists", name));

        let id = self
            .runtime
            .create_network(spec)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Network {} created successfully. ID: {}", name, id))
    }
}

pub struct RemoveNetworkTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RemoveNetworkTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RemoveNetworkTool {
    fn name(&self) -> &str {
        "remove_network"
    }

    fn description(&self) -> &str {
        "Remove a Docker network"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("id", "Network ID or name")],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let failure =
            Failure::new("removing network").not_found(format!("Network {} not found", id));

        let network = resolve_network(self.runtime.as_ref(), id, &failure).await?;
        self.runtime
            .remove_network(&network.id)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Network {} removed successfully", id))
    }
}

pub struct ListNetworksTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ListNetworksTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for ListNetworksTool {
    fn name(&self) -> &str {
        "list_networks"
    }

    fn description(&self) -> &str {
        "List Docker networks"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), Vec::new())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn execute(&self, _args: &ToolArguments) -> Result<String, ToolError> {
        let failure = Failure::new("listing networks");
        let networks = self
            .runtime
            .list_networks()
            .await
            .map_err(|e| failure.map(e))?;
        pretty_json(&networks, &failure)
    }
}
