//! exec_container

use crate::exec::{ExecError, ExecOptions, ExecutionBridge};
use crate::runtime::ContainerRuntime;
use crate::tools::failure::{Failure, resolve_container};
use async_trait::async_trait;
use dockmcp_core::config::DEFAULT_EXEC_TIMEOUT_SECS;
use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
use std::sync::Arc;
use tracing::instrument;

/// Runs a command inside a running container
pub struct ExecContainerTool {
    runtime: Arc<dyn ContainerRuntime>,
    bridge: ExecutionBridge,
    default_timeout_secs: u64,
}

impl ExecContainerTool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self::with_default_timeout(runtime, DEFAULT_EXEC_TIMEOUT_SECS)
    }

    pub fn with_default_timeout(runtime: Arc<dyn ContainerRuntime>, seconds: u64) -> Self {
        Self {
            bridge: ExecutionBridge::new(runtime.clone()),
            runtime,
            default_timeout_secs: seconds,
        }
    }
}

#[async_trait]
impl Tool for ExecContainerTool {
    fn name(&self) -> &str {
        "exec_container"
    }

    fn description(&self) -> &str {
        "Execute a command inside a running Docker container. WARNING: This provides arbitrary command execution within the container. Ensure proper security measures are in place."
    }

    fn schema(&self) -> ToolSchema {
        let timeout_description = format!(
            "Timeout in seconds (optional, default: {})",
            self.default_timeout_secs
        );
        ToolSchema::new(
            self.name().to_string(),
            self.description().to_string(),
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::string(
                    "cmd",
                    "Command to execute (e.g., \"ls -la /app\" or \"python script.py\")",
                ),
                ToolParameter::optional_string(
                    "working_dir",
                    "Working directory for the command (optional)",
                ),
                ToolParameter::optional_string(
                    "user",
                    "User to run the command as (optional, e.g., \"1000\" or \"username\")",
                ),
                ToolParameter::string_array("env", "Environment variables as KEY=VALUE (optional)")
                    .optional(),
                ToolParameter::optional_string(
                    "stdin",
                    "Input to send to the command via stdin (optional)",
                ),
                ToolParameter::integer("timeout".to_string(), timeout_description)
                    .optional()
                    .with_default(self.default_timeout_secs),
            ],
        )
    }

    #[instrument(skip(self, args), fields(id = args.string("id").unwrap_or("<missing>")))]
    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let id = args.require_string("id")?;
        let cmd = args.require_string("cmd")?;
        let timeout = args.require_integer("timeout")?;
        if timeout <= 0 {
            return Err(ToolError::ValidationFailed(
                "Parameter 'timeout' must be a positive integer".to_string(),
            ));
        }

        let failure =
            Failure::new("executing command").not_found(format!("Container {} not found", id));
        let container = resolve_container(self.runtime.as_ref(), id, &failure).await?;

        let options = ExecOptions {
            working_dir: args.string("working_dir").map(str::to_string),
            user: args.string("user").map(str::to_string),
            env: args.string_list("env"),
            stdin: args.string("stdin").map(str::to_string),
            timeout_secs: timeout as u64,
        };

        match self.bridge.execute(&container.id, cmd, options).await {
            Ok(outcome) => Ok(outcome.render(id)),
            Err(err @ ExecError::Timeout { .. }) => Err(ToolError::Timeout(err.to_string())),
            Err(ExecError::InvalidCommand(reason)) => Err(ToolError::ValidationFailed(format!(
                "Parameter 'cmd' could not be parsed: {}",
                reason
            ))),
            Err(ExecError::Runtime(e)) => Err(failure.map(e)),
        }
    }
}
