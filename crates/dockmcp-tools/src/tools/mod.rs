//! Docker tool handlers
//!
//! One [`Tool`] per operation, each holding the shared runtime. Handlers
//! resolve the addressed object first and translate classified runtime
//! failures into caller-facing text.

pub mod container;
pub(crate) mod failure;
pub mod image;
pub mod network;
pub mod volume;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::{
    CopyToContainerTool, CreateContainerTool, ExecContainerTool, FetchContainerLogsTool,
    ListContainersTool, RecreateContainerTool, RemoveContainerTool, RunContainerTool,
    StartContainerTool, StopContainerTool,
};
pub use image::{
    BuildImageTool, CredentialStore, ListImagesTool, PullImageTool, PushImageTool,
    RemoveImageTool, TagImageTool,
};
pub use network::{CreateNetworkTool, ListNetworksTool, RemoveNetworkTool};
pub use volume::{CreateVolumeTool, ListVolumesTool, RemoveVolumeTool};

use crate::runtime::ContainerRuntime;
use dockmcp_core::tools::Tool;
use std::sync::Arc;

/// Settings shared by the handlers
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Default `exec_container` timeout, also used for the chown after a copy
    pub exec_timeout_secs: u64,
    /// Where `push_image` looks for registry credentials
    pub credentials: CredentialStore,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            exec_timeout_secs: dockmcp_core::config::DEFAULT_EXEC_TIMEOUT_SECS,
            credentials: CredentialStore::from_env(),
        }
    }
}

/// All Docker tools, in advertisement order
pub fn docker_tools(
    runtime: Arc<dyn ContainerRuntime>,
    settings: ToolSettings,
) -> Vec<Arc<dyn Tool>> {
    let rt = || runtime.clone();
    vec![
        Arc::new(BuildImageTool::new(rt())),
        Arc::new(CopyToContainerTool::with_chown_timeout(
            rt(),
            settings.exec_timeout_secs,
        )),
        Arc::new(CreateContainerTool::new(rt())),
        Arc::new(CreateNetworkTool::new(rt())),
        Arc::new(CreateVolumeTool::new(rt())),
        Arc::new(ExecContainerTool::with_default_timeout(
            rt(),
            settings.exec_timeout_secs,
        )),
        Arc::new(FetchContainerLogsTool::new(rt())),
        Arc::new(ListContainersTool::new(rt())),
        Arc::new(ListImagesTool::new(rt())),
        Arc::new(ListNetworksTool::new(rt())),
        Arc::new(ListVolumesTool::new(rt())),
        Arc::new(PullImageTool::new(rt())),
        Arc::new(PushImageTool::with_credentials(rt(), settings.credentials)),
        Arc::new(RecreateContainerTool::new(rt())),
        Arc::new(RemoveContainerTool::new(rt())),
        Arc::new(RemoveImageTool::new(rt())),
        Arc::new(RemoveNetworkTool::new(rt())),
        Arc::new(RemoveVolumeTool::new(rt())),
        Arc::new(RunContainerTool::new(rt())),
        Arc::new(StartContainerTool::new(rt())),
        Arc::new(StopContainerTool::new(rt())),
        Arc::new(TagImageTool::new(rt())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FakeRuntime;
    use dockmcp_core::tools::ToolRegistryBuilder;

    #[test]
    fn test_registration_order_and_uniqueness() {
        let tools = docker_tools(Arc::new(FakeRuntime::new()), ToolSettings::default());
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();

        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 22);

        let registry = ToolRegistryBuilder::new().with_tools(tools).build().unwrap();
        assert_eq!(registry.len(), 22);
    }

    #[test]
    fn test_read_only_tools() {
        let tools = docker_tools(Arc::new(FakeRuntime::new()), ToolSettings::default());
        let read_only: Vec<&str> = tools
            .iter()
            .filter(|t| t.is_read_only())
            .map(|t| t.name())
            .collect();
        assert_eq!(
            read_only,
            vec![
                "fetch_container_logs",
                "list_containers",
                "list_images",
                "list_networks",
                "list_volumes"
            ]
        );
    }
}
