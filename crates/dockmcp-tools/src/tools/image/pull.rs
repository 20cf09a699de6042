//! pull_image

use crate::runtime::ContainerRuntime;
use crate::tools::failure::Failure;
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct PullImageTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl PullImageTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

/// Reference to pull: an explicit tag wins, then one embedded in the name
fn pull_reference(from_image: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}:{}", from_image, tag),
        None if from_image.contains(':') => from_image.to_string(),
        None => format!("{}:latest", from_image),
    }
}

#[async_trait]
impl Tool for PullImageTool {
    fn name(&self) -> &str {
        "pull_image"
    }

    fn description(&self) -> &str {
        "Pull a Docker image"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string(
                    "from_image",
                    "Image name to pull (e.g., \"ubuntu\" or \"ubuntu:22.04\")",
                ),
                ToolParameter::optional_string(
                    "tag",
                    "Tag to pull (optional, defaults to \"latest\" if not specified in from_image)",
                ),
            ],
        )
    }

    #[instrument(skip(self, args), fields(image = args.string("from_image").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let reference = pull_reference(args.require_string("from_image")?, args.string("tag"));
        let failure =
            Failure::new("pulling image").not_found(format!("Image {} not found", reference));

        let id = self
            .runtime
            .pull_image(&reference)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Image {} pulled successfully. ID: {}", reference, id))
    }
}
