//! Volume tools

use crate::runtime::{ContainerRuntime, VolumeSpec};
use crate::tools::failure::{Failure, pretty_json, resolve_volume};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct CreateVolumeTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl CreateVolumeTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for CreateVolumeTool {
    fn name(&self) -> &str {
        "create_volume"
    }

    fn description(&self) -> &str {
        "Create a Docker volume"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("name", "Name of the volume"),
                ToolParameter::string("driver", "Driver to use (default: local)")
                    .optional()
                    .with_default("local"),
            ],
        )
    }

    #[instrument(skip(self, args), fields(name = args.string("name").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let name = args.require_string("name")?;
        let spec = VolumeSpec {
            name: name.to_string(),
            driver: args.require_string("driver")?.to_string(),
        };
        let failure =
            Failure::new("creating volume").conflict(format!("Volume {} already exists", name));

        self.runtime
            .create_volume(spec)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Volume {} created successfully", name))
    }
}

pub struct RemoveVolumeTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RemoveVolumeTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RemoveVolumeTool {
    fn name(&self) -> &str {
        "remove_volume"
    }

    fn description(&self) -> &str {
        "Remove a Docker volume"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("name", "Volume name"),
                ToolParameter::boolean("force", "Force removal of the volume (default: false)")
                    .optional()
                    .with_default(false),
            ],
        )
    }

    #[instrument(skip(self, args), fields(name = args.string("name").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let name = args.require_string("name")?;
        let failure =
            Failure::new("removing volume").not_found(format!("Volume {} not found", name));

        let volume = resolve_volume(self.runtime.as_ref(), name, &failure).await?;
        self.runtime
            .remove_volume(&volume.name, args.require_bool("force")?)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Volume {} removed successfully", name))
    }
}

pub struct ListVolumesTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ListVolumesTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for ListVolumesTool {
    fn name(&self) -> &str {
        "list_volumes"
    }

    fn description(&self) -> &str {
        "List Docker volumes"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), Vec::new())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn execute(&self, _args: &ToolArguments) -> Result<String, ToolError> {
        let failure = Failure::new("listing volumes");
        let volumes = self
            .runtime
            .list_volumes()
            .await
            .map_err(|e| failure.map(e))?;
        pretty_json(&volumes, &failure)
    }
}
