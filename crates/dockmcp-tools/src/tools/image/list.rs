//! list_images

use crate::runtime::ContainerRuntime;
use crate::tools::failure::{Failure, pretty_json};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolSchema};
use std::sync::Arc;

pub struct ListImagesTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ListImagesTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for ListImagesTool {
    fn name(&self) -> &str {
        "list_images"
    }

    fn description(&self) -> &str {
        "List Docker images"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), Vec::new())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn execute(&self, _args: &ToolArguments) -> Result<String, ToolError> {
        let failure = Failure::new("listing images");
        let images = self
            .runtime
            .list_images()
            .await
            .map_err(|e| failure.map(e))?;
        pretty_json(&images, &failure)
    }
}
