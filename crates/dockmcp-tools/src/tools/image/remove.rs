//! remove_image

use crate::runtime::ContainerRuntime;
use crate::tools::failure::{Failure, resolve_image};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct RemoveImageTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl RemoveImageTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RemoveImageTool {
    fn name(&self) -> &str {
        "remove_image"
    }

    fn description(&self) -> &str {
        "Remove a Docker image"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Image ID, name, or name:tag"),
                ToolParameter::boolean("force", "Force removal of the image (default: false)")
                    .optional()
                    .with_default(false),
                ToolParameter::boolean(
                    "noprune",
                    "Do not delete untagged parents (default: false)",
                )
                .optional()
                .with_default(false),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let failure =
            Failure::new("removing image").not_found(format!("Image {} not found", id));

        resolve_image(self.runtime.as_ref(), id, &failure).await?;
        // Removal goes by the caller's reference so only that tag is dropped
        self.runtime
            .remove_image(
                id,
                args.require_bool("force")?,
                args.require_bool("noprune")?,
            )
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Image {} removed successfully", id))
    }
}
