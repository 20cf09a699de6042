//! Container runtime facade
//!
//! [`ContainerRuntime`] is the only path from the tool handlers to the
//! container daemon. Every method takes a plain options record and returns a
//! classified [`RuntimeError`]; none of them format user-facing text.
//!
//! - [`DockerRuntime`] talks to the Docker Engine API through `bollard`
//! - [`FakeRuntime`] keeps containers, images, networks and volumes in memory

pub mod docker;
pub mod error;
pub mod fake;

pub use docker::DockerRuntime;
pub use error::{RuntimeError, RuntimeResult};
pub use fake::FakeRuntime;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tar archive delivered in chunks
pub type ArchiveStream = BoxStream<'static, Bytes>;

/// Configuration for a new container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Container name; the runtime picks one when absent
    pub name: Option<String>,
    /// Image reference
    pub image: String,
    /// Command tokens
    pub cmd: Option<Vec<String>>,
    /// Environment as `KEY=VALUE` entries
    pub env: Option<Vec<String>>,
    /// Exposed ports as `port/protocol` keys
    pub exposed_ports: Option<Vec<String>>,
    /// Docker API `HostConfig` object
    pub host_config: Option<Value>,
}

/// Identity of a freshly created container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedContainer {
    /// Full container ID
    pub id: String,
    /// Name without the leading `/`
    pub name: Option<String>,
}

/// Snapshot of an existing container's configuration and state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerDetails {
    /// Full container ID
    pub id: String,
    /// Name without the leading `/`
    pub name: Option<String>,
    /// Image the container was created from
    pub image: String,
    /// Command tokens
    pub cmd: Option<Vec<String>>,
    /// Environment entries
    pub env: Option<Vec<String>>,
    /// Exposed `port/protocol` keys
    pub exposed_ports: Option<Vec<String>>,
    /// Host configuration as reported by the daemon
    pub host_config: Option<Value>,
    /// Whether the container is running
    pub running: bool,
}

impl ContainerDetails {
    /// Spec that recreates this container with the same configuration
    pub fn to_spec(&self) -> ContainerSpec {
        ContainerSpec {
            name: self.name.clone(),
            image: self.image.clone(),
            cmd: self.cmd.clone(),
            env: self.env.clone(),
            exposed_ports: self.exposed_ports.clone(),
            host_config: self.host_config.clone(),
        }
    }
}

/// Options for removing a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveContainerOptions {
    /// Kill a running container first
    pub force: bool,
    /// Remove anonymous volumes attached to the container
    pub volumes: bool,
}

/// Which log streams to fetch and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Include stdout
    pub stdout: bool,
    /// Include stderr
    pub stderr: bool,
    /// Prefix lines with timestamps
    pub timestamps: bool,
    /// Only the last N lines; all lines when `None`
    pub tail: Option<i64>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: true,
            timestamps: false,
            tail: None,
        }
    }
}

/// A command to run inside a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecSpec {
    /// Command tokens; the first one is the program
    pub cmd: Vec<String>,
    /// Working directory inside the container
    pub working_dir: Option<String>,
    /// User (name or uid) to run as
    pub user: Option<String>,
    /// Extra `KEY=VALUE` environment entries
    pub env: Option<Vec<String>>,
    /// Data written to the process's stdin, which is then closed
    pub stdin: Option<String>,
}

/// Output of a finished exec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Stdout chunks in arrival order
    pub stdout: Vec<String>,
    /// Stderr chunks in arrival order
    pub stderr: Vec<String>,
    /// Exit code, if the daemon reported one
    pub exit_code: Option<i64>,
}

/// Image identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDetails {
    /// Image ID (`sha256:...`)
    pub id: String,
    /// Tags pointing at the image
    pub repo_tags: Vec<String>,
}

/// Options for tagging an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Target repository
    pub repo: String,
    /// Target tag
    pub tag: String,
    /// Move the tag even if it already points at another image
    pub force: bool,
}

/// Credentials sent with a push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryCredentials {
    /// Registry address the credentials belong to
    pub server_address: String,
    /// User name
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Identity token (OAuth refresh token)
    pub identity_token: Option<String>,
}

/// What to push and how to authenticate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushSpec {
    /// Repository (or full reference) to push
    pub name: String,
    /// Tag to push; all local tags of the repository when `None`
    pub tag: Option<String>,
    /// Credentials; the push goes out unauthenticated when `None`
    pub credentials: Option<RegistryCredentials>,
}

/// Configuration for a new network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    /// Network name
    pub name: String,
    /// Driver (`bridge`, `overlay`, ...)
    pub driver: String,
    /// Refuse to create a second network with the same name
    pub check_duplicate: bool,
}

/// Network identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkDetails {
    /// Network ID
    pub id: String,
    /// Network name
    pub name: String,
    /// Driver
    pub driver: String,
}

/// Configuration for a new volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSpec {
    /// Volume name
    pub name: String,
    /// Driver (`local`, ...)
    pub driver: String,
}

/// Volume identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeDetails {
    /// Volume name
    pub name: String,
    /// Driver
    pub driver: String,
}

/// Capability set of a container daemon
///
/// Handles are IDs or names; implementations resolve them on every call and
/// never cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    // Containers

    /// Create a container without starting it
    async fn create_container(&self, spec: ContainerSpec) -> RuntimeResult<CreatedContainer>;

    /// Inspect a container
    async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerDetails>;

    /// Start a container
    async fn start_container(&self, id: &str) -> RuntimeResult<()>;

    /// Stop a container, killing it after `timeout_secs`
    async fn stop_container(&self, id: &str, timeout_secs: i64) -> RuntimeResult<()>;

    /// Remove a container
    async fn remove_container(&self, id: &str, options: RemoveContainerOptions)
    -> RuntimeResult<()>;

    /// List containers as reported by the daemon
    async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<Value>>;

    /// Fetch the logs of a container
    async fn container_logs(&self, id: &str, options: LogOptions) -> RuntimeResult<String>;

    /// Run a command inside a container and wait for it to finish
    async fn exec(&self, id: &str, spec: ExecSpec) -> RuntimeResult<ExecOutput>;

    /// Extract a tar archive into a directory of a container
    ///
    /// The archive is consumed as it arrives; dropping it early tells the
    /// producer to stop.
    async fn upload_archive(
        &self,
        id: &str,
        destination: &str,
        archive: ArchiveStream,
    ) -> RuntimeResult<()>;

    // Images

    /// Build an image from a Dockerfile, returning the new image ID
    async fn build_image(&self, dockerfile: &str) -> RuntimeResult<String>;

    /// Pull an image reference (`repo:tag`), returning its image ID
    async fn pull_image(&self, reference: &str) -> RuntimeResult<String>;

    /// Inspect an image
    async fn inspect_image(&self, id: &str) -> RuntimeResult<ImageDetails>;

    /// List images as reported by the daemon
    async fn list_images(&self) -> RuntimeResult<Vec<Value>>;

    /// Remove an image
    async fn remove_image(&self, id: &str, force: bool, noprune: bool) -> RuntimeResult<()>;

    /// Tag an image
    async fn tag_image(&self, id: &str, spec: TagSpec) -> RuntimeResult<()>;

    /// Push an image to its registry
    async fn push_image(&self, spec: PushSpec) -> RuntimeResult<()>;

    // Networks

    /// Create a network, returning its ID
    async fn create_network(&self, spec: NetworkSpec) -> RuntimeResult<String>;

    /// Inspect a network
    async fn inspect_network(&self, id: &str) -> RuntimeResult<NetworkDetails>;

    /// List networks as reported by the daemon
    async fn list_networks(&self) -> RuntimeResult<Vec<Value>>;

    /// Remove a network
    async fn remove_network(&self, id: &str) -> RuntimeResult<()>;

    // Volumes

    /// Create a volume, returning its name
    async fn create_volume(&self, spec: VolumeSpec) -> RuntimeResult<String>;

    /// Inspect a volume
    async fn inspect_volume(&self, name: &str) -> RuntimeResult<VolumeDetails>;

    /// List volumes as reported by the daemon
    async fn list_volumes(&self) -> RuntimeResult<Vec<Value>>;

    /// Remove a volume
    async fn remove_volume(&self, name: &str, force: bool) -> RuntimeResult<()>;
}
