//! list_containers

use crate::runtime::ContainerRuntime;
use crate::tools::failure::{Failure, pretty_json};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;

pub struct ListContainersTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ListContainersTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for ListContainersTool {
    fn name(&self) -> &str {
        "list_containers"
    }

    fn description(&self) -> &str {
        "List Docker containers"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::boolean(
                    "all",
                    "Show all containers (default shows all containers including stopped ones)",
                )
                .optional()
                .with_default(true),
            ],
        )
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let failure = Failure::new("listing containers");
        let containers = self
            .runtime
            .list_containers(args.require_bool("all")?)
            .await
            .map_err(|e| failure.map(e))?;
        pretty_json(&containers, &failure)
    }
}
