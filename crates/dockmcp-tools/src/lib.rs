//! Docker tools for dockmcp
//!
//! - [`runtime`] - the container runtime facade and its Docker and in-memory
//!   implementations
//! - [`archive`] - tar packing of local files for `copy_to_container`
//! - [`exec`] - command execution inside containers under a deadline
//! - [`tools`] - the 22 tool handlers

pub mod archive;
pub mod exec;
pub mod runtime;
pub mod tools;

pub use archive::{ArchiveBuilder, ArchiveEntry, ArchiveError, EntryKind};
pub use exec::{ExecError, ExecOptions, ExecutionBridge, ExecutionOutcome};
pub use runtime::{ContainerRuntime, DockerRuntime, FakeRuntime, RuntimeError, RuntimeResult};
pub use tools::{CredentialStore, ToolSettings, docker_tools};

use dockmcp_core::tools::{ToolError, ToolRegistry, ToolRegistryBuilder};
use std::sync::Arc;

/// Registry holding every Docker tool
pub fn docker_registry(
    runtime: Arc<dyn ContainerRuntime>,
    settings: ToolSettings,
) -> Result<ToolRegistry, ToolError> {
    ToolRegistryBuilder::new()
        .with_tools(docker_tools(runtime, settings))
        .build()
}
