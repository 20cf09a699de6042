//! copy_to_container

use crate::archive::{ArchiveBuilder, ArchiveError};
use crate::exec::{ExecOptions, ExecutionBridge};
use crate::runtime::ContainerRuntime;
use crate::tools::failure::{Failure, resolve_container};
use async_trait::async_trait;
use dockmcp_core::config::DEFAULT_EXEC_TIMEOUT_SECS;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Copies a local file or directory into a container
///
/// The archive is packed on a blocking thread and streamed to the daemon as
/// it is produced.
/// When `owner` is given, ownership is changed afterwards with `chown -R`;
/// a failed chown is reported but the copy stays in place.
pub struct CopyToContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
    bridge: ExecutionBridge,
    chown_timeout_secs: u64,
}

impl CopyToContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self::with_chown_timeout(runtime, DEFAULT_EXEC_TIMEOUT_SECS)
    }

    pub fn with_chown_timeout(runtime: Arc<dyn ContainerRuntime>, seconds: u64) -> Self {
        Self {
            bridge: ExecutionBridge::new(runtime.clone()),
            runtime,
            chown_timeout_secs: seconds,
        }
    }

    async fn chown(&self, container: &str, owner: &str, path: String) -> Result<(), String> {
        let argv = vec![
            "chown".to_string(),
            "-R".to_string(),
            owner.to_string(),
            path,
        ];
        let outcome = self
            .bridge
            .execute_argv(container, argv, ExecOptions::with_timeout(self.chown_timeout_secs))
            .await
            .map_err(|e| e.to_string())?;

        if outcome.succeeded() {
            Ok(())
        } else {
            let stderr = outcome.stderr_text();
            Err(format!(
                "exit code {}{}",
                outcome.exit_code,
                if stderr.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", stderr.trim())
                }
            ))
        }
    }
}

fn join_container_path(directory: &str, name: &str) -> String {
    if directory.ends_with('/') {
        format!("{}{}", directory, name)
    } else {
        format!("{}/{}", directory, name)
    }
}

#[async_trait]
impl Tool for CopyToContainerTool {
    fn name(&self) -> &str {
        "copy_to_container"
    }

    fn description(&self) -> &str {
        "Copy a file or directory from the local filesystem into a running Docker container. The source path is on the local machine, and the destination path is inside the container."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::string(
                    "source_path",
                    "Path to the file or directory on the local filesystem to copy",
                ),
                ToolParameter::string(
                    "destination_path",
                    "Path inside the container where the file/directory should be copied",
                ),
                ToolParameter::optional_string(
                    "owner",
                    "Owner for the copied files (optional, e.g., \"1000:1000\" or \"username:group\")",
                ),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let source_path = args.require_string("source_path")?;
        let destination = args.require_string("destination_path")?;
        let owner = args.string("owner");

        let failure = Failure::new("copying to container")
            .not_found(format!("Container {} not found", id));
        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;

        let builder = match ArchiveBuilder::new(source_path) {
            Ok(builder) => builder,
            Err(ArchiveError::SourceNotFound(_)) => {
                return Err(ToolError::ResourceNotFound(format!(
                    "Source path not found: {}",
                    source_path
                )));
            }
            Err(e) => return Err(failure.other(e)),
        };
        let is_directory = builder.is_directory();
        let root_name = builder.root_name().to_string();

        let (chunks, packing) = builder.into_stream();
        let uploaded = self
            .runtime
            .upload_archive(&container.id, destination, Box::pin(chunks))
            .await;

        // An upload error explains a cut-short stream, so it is reported first.
        let upload_failure = Failure::new("copying to container").not_found(format!(
            "Destination path {} not found in container {}",
            destination, id
        ));
        uploaded.map_err(|e| upload_failure.map(e))?;
        let bytes = packing
            .await
            .map_err(|e| failure.other(e))?
            .map_err(|e| failure.other(e))?;
        debug!(bytes, "Archive uploaded");

        let kind = if is_directory { "directory" } else { "file" };
        let mut text = format!(
            "Successfully copied {} from {} to {}:{}",
            kind, source_path, id, destination
        );

        if let Some(owner) = owner {
            let target = join_container_path(destination, &root_name);
            match self.chown(&container.id, owner, target).await {
                Ok(()) => text.push_str(&format!("\nOwnership changed to {}", owner)),
                Err(reason) => {
                    warn!(owner, %reason, "Ownership change failed after copy");
                    text.push_str(&format!(
                        "\nWarning: failed to change ownership to {}: {}",
                        owner, reason
                    ));
                }
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ContainerSpec, ExecOutput, FakeRuntime};
    use crate::tools::test_support::call;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    async fn runtime_with_container() -> FakeRuntime {
        let runtime = FakeRuntime::new().with_image("alpine");
        let spec = ContainerSpec {
            name: Some("box".into()),
            image: "alpine".into(),
            ..Default::default()
        };
        runtime.create_container(spec).await.unwrap();
        runtime.start_container("box").await.unwrap();
        runtime
    }

    #[test]
    fn test_join_container_path() {
        assert_eq!(join_container_path("/srv", "app"), "/srv/app");
        assert_eq!(join_container_path("/srv/", "app"), "/srv/app");
        assert_eq!(join_container_path("/", "app"), "/app");
    }

    #[tokio::test]
    async fn test_copy_file_with_owner() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.yml");
        fs::write(&file, "a: 1\n").unwrap();

        let runtime = runtime_with_container().await;
        let tool = CopyToContainerTool::new(Arc::new(runtime.clone()));
        let source = file.to_string_lossy().to_string();

        let result = call(
            &tool,
            json!({"id": "box", "source_path": source, "destination_path": "/etc/app", "owner": "1000:1000"}),
        )
        .await;

        assert_eq!(
            result.text(),
            format!(
                "Successfully copied file from {} to box:/etc/app\nOwnership changed to 1000:1000",
                source
            )
        );

        let uploads = runtime.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].destination, "/etc/app");

        let execs = runtime.execs();
        assert_eq!(
            execs[0].spec.cmd,
            vec!["chown", "-R", "1000:1000", "/etc/app/config.yml"]
        );
    }

    #[tokio::test]
    async fn test_failed_chown_keeps_copy() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("site")).unwrap();

        let runtime = runtime_with_container()
            .await
            .with_exec_handler(|_| ExecOutput {
                stdout: vec![],
                stderr: vec!["chown: unknown user nobody2\n".into()],
                exit_code: Some(1),
            });
        let tool = CopyToContainerTool::new(Arc::new(runtime.clone()));
        let source = dir.path().join("site").to_string_lossy().to_string();

        let result = call(
            &tool,
            json!({"id": "box", "source_path": source, "destination_path": "/var/www", "owner": "nobody2"}),
        )
        .await;

        assert!(result.success);
        assert!(result.text().starts_with("Successfully copied directory from "));
        assert!(result.text().contains("failed to change ownership to nobody2: exit code 1"));
        assert_eq!(runtime.uploads().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_source_and_container() {
        let runtime = runtime_with_container().await;
        let tool = CopyToContainerTool::new(Arc::new(runtime.clone()));

        let result = call(
            &tool,
            json!({"id": "box", "source_path": "/definitely/not/here", "destination_path": "/tmp"}),
        )
        .await;
        assert_eq!(result.text(), "Source path not found: /definitely/not/here");
        assert_eq!(result.error_kind(), Some("TOOL_RESOURCE_NOT_FOUND"));

        let result = call(
            &tool,
            json!({"id": "ghost", "source_path": "/tmp", "destination_path": "/tmp"}),
        )
        .await;
        assert_eq!(result.text(), "Container ghost not found");
        assert!(runtime.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_stops_packing() {
        use crate::runtime::{ContainerDetails, MockContainerRuntime, RuntimeError};

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("dump.bin");
        fs::write(&source, vec![0u8; 4 * 1024 * 1024]).unwrap();

        let mut mock = MockContainerRuntime::new();
        mock.expect_inspect_container().returning(|_| {
            Ok(ContainerDetails {
                id: "c0ffee".into(),
                running: true,
                ..ContainerDetails::default()
            })
        });
        mock.expect_upload_archive()
            .times(1)
            .returning(|_, _, _| Err(RuntimeError::NotFound("no such directory".into())));
        let tool = CopyToContainerTool::new(Arc::new(mock));

        let result = call(
            &tool,
            json!({"id": "box", "source_path": source.to_string_lossy(), "destination_path": "/nope"}),
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.text(), "Destination path /nope not found in container box");
    }
}
