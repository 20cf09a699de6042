//! tag_image

use crate::runtime::{ContainerRuntime, TagSpec};
use crate::tools::failure::{Failure, resolve_image};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

pub struct TagImageTool {
    runtime: Arc<dyn ContainerRuntime>,
}

impl TagImageTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for TagImageTool {
    fn name(&self) -> &str {
        "tag_image"
    }

    fn description(&self) -> &str {
        "Tag a Docker image"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Image ID or current name:tag"),
                ToolParameter::string(
                    "repo",
                    "Repository name (e.g., \"username/imagename\" or \"registry/username/imagename\")",
                ),
                ToolParameter::string("tag", "Tag for the image (default: \"latest\")")
                    .optional()
                    .with_default("latest"),
                ToolParameter::boolean(
                    "force",
                    "Force tag even if it already exists (default: true)",
                )
                .optional()
                .with_default(true),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let repo = args.require_string("repo")?;
        let tag = args.require_string("tag")?;
        let failure =
            Failure::new("tagging image").not_found(format!("Image {} not found", id));

        let image = resolve_image(self.runtime.as_ref(), id, &failure).await?;
        let spec = TagSpec {
            repo: repo.to_string(),
            tag: tag.to_string(),
            force: args.require_bool("force")?,
        };
        self.runtime
            .tag_image(&image.id, spec)
            .await
            .map_err(|e| failure.map(e))?;

        Ok(format!("Image tagged successfully as {}:{}", repo, tag))
    }
}
