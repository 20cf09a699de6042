//! push_image

use super::credentials::CredentialStore;
use crate::runtime::{ContainerRuntime, PushSpec};
use crate::tools::failure::{Failure, resolve_image, split_reference};
use async_trait::async_trait;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const AUTHENTICATION_HINT: &str =
    "Authentication failed. Please authenticate with 'docker login' first";

/// Pushes an image to its registry
///
/// Names without a registry or user prefix are refused before the runtime is
/// contacted. Credentials come from the Docker CLI config; without any the
/// push goes out unauthenticated.
pub struct PushImageTool {
    runtime: Arc<dyn ContainerRuntime>,
    credentials: CredentialStore,
}

impl PushImageTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self::with_credentials(runtime, CredentialStore::from_env())
    }

    pub fn with_credentials(runtime: Arc<dyn ContainerRuntime>, credentials: CredentialStore) -> Self {
        Self {
            runtime,
            credentials,
        }
    }
}

#[async_trait]
impl Tool for PushImageTool {
    fn name(&self) -> &str {
        "push_image"
    }

    fn description(&self) -> &str {
        "Push a Docker image"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("name", "Image name or ID to push"),
                ToolParameter::optional_string(
                    "tag",
                    "Tag to push (optional, pushes all tags if not specified)",
                ),
                ToolParameter::optional_string(
                    "repo_tag",
                    "Full repo:tag to push (e.g., \"registry/repo:tag\") (optional)",
                ),
            ],
        )
    }

    #[instrument(skip(self, args), fields(name = args.string("name").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let name = args.require_string("name")?;
        let tag = args.string("tag");
        let repo_tag = args.string("repo_tag");

        if !name.contains('/') && !repo_tag.is_some_and(|r| r.contains('/')) {
            return Err(ToolError::ValidationFailed(format!(
                "Image name must include registry/username (e.g., 'username/{}'). Local images cannot be pushed without a registry prefix.",
                name
            )));
        }

        let failure = Failure::new("pushing image")
            .not_found(format!("Image {} not found", name))
            .authentication(AUTHENTICATION_HINT);

        let local = match tag {
            Some(tag) => format!("{}:{}", name, tag),
            None => name.to_string(),
        };
        resolve_image(self.runtime.as_ref(), &local, &failure).await?;

        let (push_name, push_tag) = match repo_tag {
            Some(repo_tag) => split_reference(repo_tag),
            None => (name.to_string(), tag.map(str::to_string)),
        };

        let credentials = self.credentials.lookup(&push_name).await;
        if credentials.is_none() {
            warn!(image = %push_name, "No registry credentials found, pushing unauthenticated");
        }

        let spec = PushSpec {
            name: push_name,
            tag: push_tag,
            credentials,
        };
        self.runtime
            .push_image(spec)
            .await
            .map_err(|e| failure.map(e))?;

        let target = repo_tag.map(str::to_string).unwrap_or(local);
        info!(%target, "Image pushed");
        Ok(format!("Image {} pushed successfully", target))
    }
}
