//! build_image

use crate::runtime::{ContainerRuntime, TagSpec};
use crate::tools::failure::{Failure, split_reference};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Builds an image from inline Dockerfile content
pub struct BuildImageTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl BuildImageTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for BuildImageTool {
    fn name(&self) -> &str {
        "build_image"
    }

    fn description(&self) -> &str {
        "Build a Docker image"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("dockerfile", "Dockerfile content as a string"),
                ToolParameter::optional_string(
                    "tag",
                    "Tag for the built image (e.g., \"myimage:latest\")",
                ),
            ],
        )
    }

    #[instrument(skip(self, args), fields(tag = args.string("tag").unwrap_or("<none>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let dockerfile = args.require_string("dockerfile")?;
        let tag = args.string("tag");
        let failure = Failure::new("building image");

        let image_id = self
            .runtime
            .build_image(dockerfile)
            .await
            .map_err(|e| failure.map(e))?;
        debug!(%image_id, "Image built");

        let mut text = format!("Image built successfully. ID: {}", image_id);
        if let Some(tag) = tag {
            let (repo, image_tag) = split_reference(tag);
            let spec = TagSpec {
                repo,
                tag: image_tag.unwrap_or_else(|| "latest".to_string()),
                force: true,
            };
            self.runtime
                .tag_image(&image_id, spec)
                .await
                .map_err(|e| failure.map(e))?;
            text.push_str(&format!(", Tag: {}", tag));
        }

        Ok(text)
    }
}
