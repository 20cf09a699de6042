//! In-memory runtime for tests and dry runs
//!
//! Mirrors the daemon behaviors the handlers depend on: name and ID-prefix
//! resolution, conflicts on duplicate names, refusal to remove running
//! containers or images in use, and registry authentication on push.

use super::{
    ArchiveStream, ContainerDetails, ContainerRuntime, ContainerSpec, CreatedContainer, ExecOutput, ExecSpec,
    ImageDetails, LogOptions, NetworkDetails, NetworkSpec, PushSpec, RemoveContainerOptions,
    RuntimeError, RuntimeResult, TagSpec, VolumeDetails, VolumeSpec,
};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

type ExecHandler = Arc<dyn Fn(&ExecSpec) -> ExecOutput + Send + Sync>;

/// Archive received by [`ContainerRuntime::upload_archive`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub container_id: String,
    pub destination: String,
    pub archive: Bytes,
}

/// Command received by [`ContainerRuntime::exec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExec {
    pub container_id: String,
    pub spec: ExecSpec,
}

#[derive(Debug, Clone)]
struct FakeContainer {
    id: String,
    name: String,
    spec: ContainerSpec,
    running: bool,
    logs: Vec<(bool, String)>,
}

#[derive(Debug, Clone)]
struct FakeImage {
    id: String,
    tags: Vec<String>,
}

#[derive(Default)]
struct State {
    containers: Vec<FakeContainer>,
    images: Vec<FakeImage>,
    registry: Vec<String>,
    networks: Vec<NetworkDetails>,
    volumes: Vec<VolumeDetails>,
    uploads: Vec<RecordedUpload>,
    execs: Vec<RecordedExec>,
    pushes: Vec<PushSpec>,
    operations: Vec<String>,
    exec_handler: Option<ExecHandler>,
    exec_delay: Option<Duration>,
    push_requires_auth: bool,
}

/// In-memory [`ContainerRuntime`]
#[derive(Clone)]
pub struct FakeRuntime {
    state: Arc<Mutex<State>>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn normalize_reference(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    if last.contains(':') || reference.contains('@') {
        reference.to_string()
    } else {
        format!("{}:latest", reference)
    }
}

impl FakeRuntime {
    /// Empty runtime with the default `bridge`, `host` and `none` networks
    pub fn new() -> Self {
        let networks = [("bridge", "bridge"), ("host", "host"), ("none", "null")]
            .into_iter()
            .map(|(name, driver)| NetworkDetails {
                id: new_id(),
                name: name.to_string(),
                driver: driver.to_string(),
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                networks,
                ..State::default()
            })),
        }
    }

    /// Add a local image
    pub fn with_image(self, reference: &str) -> Self {
        self.add_image(reference);
        self
    }

    /// Make a reference available for pulling
    pub fn with_registry_image(self, reference: &str) -> Self {
        self.state.lock().registry.push(normalize_reference(reference));
        self
    }

    /// Reject pushes that carry no credentials
    pub fn with_push_auth_required(self) -> Self {
        self.state.lock().push_requires_auth = true;
        self
    }

    /// Answer every exec with `handler`
    pub fn with_exec_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&ExecSpec) -> ExecOutput + Send + Sync + 'static,
    {
        self.state.lock().exec_handler = Some(Arc::new(handler));
        self
    }

    /// Delay every exec before answering
    pub fn with_exec_delay(self, delay: Duration) -> Self {
        self.state.lock().exec_delay = Some(delay);
        self
    }

    /// Add a local image, returning its ID
    pub fn add_image(&self, reference: &str) -> String {
        let id = format!("sha256:{}", new_id());
        self.state.lock().images.push(FakeImage {
            id: id.clone(),
            tags: vec![normalize_reference(reference)],
        });
        id
    }

    /// Append a log line to a container
    pub fn add_log(&self, container: &str, stderr: bool, line: &str) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_container(&state, container)?;
        state.containers[index].logs.push((stderr, line.to_string()));
        Ok(())
    }

    /// Uploads received so far
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().uploads.clone()
    }

    /// Execs received so far
    pub fn execs(&self) -> Vec<RecordedExec> {
        self.state.lock().execs.clone()
    }

    /// Pushes accepted so far
    pub fn pushes(&self) -> Vec<PushSpec> {
        self.state.lock().pushes.clone()
    }

    /// Mutating operations in call order, e.g. `stop:<id>`
    pub fn operations(&self) -> Vec<String> {
        self.state.lock().operations.clone()
    }

    /// Number of containers, running or not
    pub fn container_count(&self) -> usize {
        self.state.lock().containers.len()
    }
}

fn find_container(state: &State, handle: &str) -> RuntimeResult<usize> {
    let handle = handle.trim_start_matches('/');
    state
        .containers
        .iter()
        .position(|c| c.id == handle || c.name == handle)
        .or_else(|| {
            let mut matches = state
                .containers
                .iter()
                .enumerate()
                .filter(|(_, c)| c.id.starts_with(handle));
            match (matches.next(), matches.next()) {
                (Some((index, _)), None) if !handle.is_empty() => Some(index),
                _ => None,
            }
        })
        .ok_or_else(|| RuntimeError::NotFound(format!("No such container: {}", handle)))
}

fn find_image(state: &State, handle: &str) -> RuntimeResult<usize> {
    let reference = normalize_reference(handle);
    let bare = handle.trim_start_matches("sha256:");
    state
        .images
        .iter()
        .position(|image| {
            image.tags.contains(&reference)
                || image.id == handle
                || (!bare.is_empty() && image.id.trim_start_matches("sha256:").starts_with(bare))
        })
        .ok_or_else(|| RuntimeError::NotFound(format!("No such image: {}", handle)))
}

fn find_network(state: &State, handle: &str) -> RuntimeResult<usize> {
    state
        .networks
        .iter()
        .position(|n| n.id == handle || n.name == handle)
        .or_else(|| {
            state
                .networks
                .iter()
                .position(|n| !handle.is_empty() && n.id.starts_with(handle))
        })
        .ok_or_else(|| RuntimeError::NotFound(format!("network {} not found", handle)))
}

fn find_volume(state: &State, name: &str) -> RuntimeResult<usize> {
    state
        .volumes
        .iter()
        .position(|v| v.name == name)
        .ok_or_else(|| RuntimeError::NotFound(format!("get {}: no such volume", name)))
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn create_container(&self, spec: ContainerSpec) -> RuntimeResult<CreatedContainer> {
        let mut state = self.state.lock();
        find_image(&state, &spec.image)?;

        let id = new_id();
        let name = match &spec.name {
            Some(name) => {
                if state.containers.iter().any(|c| &c.name == name) {
                    return Err(RuntimeError::Conflict(format!(
                        "Conflict. The container name \"/{}\" is already in use",
                        name
                    )));
                }
                name.clone()
            }
            None => format!("fake_{}", &id[..12]),
        };

        state.operations.push(format!("create:{}", name));
        state.containers.push(FakeContainer {
            id: id.clone(),
            name: name.clone(),
            spec,
            running: false,
            logs: Vec::new(),
        });

        Ok(CreatedContainer {
            id,
            name: Some(name),
        })
    }

    async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerDetails> {
        let state = self.state.lock();
        let container = &state.containers[find_container(&state, id)?];
        Ok(ContainerDetails {
            id: container.id.clone(),
            name: Some(container.name.clone()),
            image: container.spec.image.clone(),
            cmd: container.spec.cmd.clone(),
            env: container.spec.env.clone(),
            exposed_ports: container.spec.exposed_ports.clone(),
            host_config: container.spec.host_config.clone(),
            running: container.running,
        })
    }

    async fn start_container(&self, id: &str) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_container(&state, id)?;
        let container = &mut state.containers[index];
        container.running = true;
        let op = format!("start:{}", container.id);
        state.operations.push(op);
        Ok(())
    }

    async fn stop_container(&self, id: &str, _timeout_secs: i64) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_container(&state, id)?;
        let container = &mut state.containers[index];
        container.running = false;
        let op = format!("stop:{}", container.id);
        state.operations.push(op);
        Ok(())
    }

    async fn remove_container(
        &self,
        id: &str,
        options: RemoveContainerOptions,
    ) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_container(&state, id)?;
        if state.containers[index].running && !options.force {
            return Err(RuntimeError::Conflict(format!(
                "You cannot remove a running container {}. Stop the container before attempting removal or force remove",
                state.containers[index].id
            )));
        }
        let removed = state.containers.remove(index);
        state.operations.push(format!("remove:{}", removed.id));
        Ok(())
    }

    async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<Value>> {
        let state = self.state.lock();
        Ok(state
            .containers
            .iter()
            .filter(|c| all || c.running)
            .map(|c| {
                let status = if c.running { "running" } else { "exited" };
                json!({
                    "Id": c.id,
                    "Names": [format!("/{}", c.name)],
                    "Image": c.spec.image,
                    "State": status,
                })
            })
            .collect())
    }

    async fn container_logs(&self, id: &str, options: LogOptions) -> RuntimeResult<String> {
        let state = self.state.lock();
        let container = &state.containers[find_container(&state, id)?];
        let lines: Vec<&str> = container
            .logs
            .iter()
            .filter(|(stderr, _)| if *stderr { options.stderr } else { options.stdout })
            .map(|(_, line)| line.as_str())
            .collect();

        let skip = match options.tail {
            Some(n) if n >= 0 => lines.len().saturating_sub(n as usize),
            _ => 0,
        };
        Ok(lines[skip..]
            .iter()
            .map(|line| format!("{}\n", line))
            .collect())
    }

    async fn exec(&self, id: &str, spec: ExecSpec) -> RuntimeResult<ExecOutput> {
        let (handler, delay) = {
            let mut state = self.state.lock();
            let index = find_container(&state, id)?;
            let container = &state.containers[index];
            if !container.running {
                return Err(RuntimeError::Conflict(format!(
                    "Container {} is not running",
                    container.id
                )));
            }
            let record = RecordedExec {
                container_id: container.id.clone(),
                spec: spec.clone(),
            };
            state.execs.push(record);
            (state.exec_handler.clone(), state.exec_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(match handler {
            Some(handler) => handler(&spec),
            None => ExecOutput {
                exit_code: Some(0),
                ..ExecOutput::default()
            },
        })
    }

    async fn upload_archive(
        &self,
        id: &str,
        destination: &str,
        mut archive: ArchiveStream,
    ) -> RuntimeResult<()> {
        find_container(&self.state.lock(), id)?;

        let mut received = BytesMut::new();
        while let Some(chunk) = archive.next().await {
            received.extend_from_slice(&chunk);
        }

        let mut state = self.state.lock();
        let index = find_container(&state, id)?;
        let upload = RecordedUpload {
            container_id: state.containers[index].id.clone(),
            destination: destination.to_string(),
            archive: received.freeze(),
        };
        state.uploads.push(upload);
        Ok(())
    }

    async fn build_image(&self, dockerfile: &str) -> RuntimeResult<String> {
        if dockerfile.trim().is_empty() {
            return Err(RuntimeError::Other(
                "the Dockerfile (Dockerfile) cannot be empty".to_string(),
            ));
        }

        let id = format!("sha256:{}", new_id());
        self.state.lock().images.push(FakeImage {
            id: id.clone(),
            tags: Vec::new(),
        });
        Ok(id)
    }

    async fn pull_image(&self, reference: &str) -> RuntimeResult<String> {
        let reference = normalize_reference(reference);
        let available = self.state.lock().registry.contains(&reference);
        if !available {
            return Err(RuntimeError::NotFound(format!(
                "pull access denied for {}, repository does not exist or may require 'docker login'",
                reference
            )));
        }

        let existing = {
            let state = self.state.lock();
            find_image(&state, &reference)
                .ok()
                .map(|index| state.images[index].id.clone())
        };
        Ok(match existing {
            Some(id) => id,
            None => self.add_image(&reference),
        })
    }

    async fn inspect_image(&self, id: &str) -> RuntimeResult<ImageDetails> {
        let state = self.state.lock();
        let image = &state.images[find_image(&state, id)?];
        Ok(ImageDetails {
            id: image.id.clone(),
            repo_tags: image.tags.clone(),
        })
    }

    async fn list_images(&self) -> RuntimeResult<Vec<Value>> {
        let state = self.state.lock();
        Ok(state
            .images
            .iter()
            .map(|image| json!({"Id": image.id, "RepoTags": image.tags}))
            .collect())
    }

    async fn remove_image(&self, id: &str, force: bool, _noprune: bool) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_image(&state, id)?;
        let image = &state.images[index];
        let in_use = state
            .containers
            .iter()
            .find(|c| image.tags.contains(&normalize_reference(&c.spec.image)) || c.spec.image == image.id);
        if let (Some(container), false) = (in_use, force) {
            return Err(RuntimeError::Conflict(format!(
                "conflict: unable to remove repository reference \"{}\" (must force) - container {} is using its referenced image",
                id, container.id
            )));
        }
        state.images.remove(index);
        Ok(())
    }

    async fn tag_image(&self, id: &str, spec: TagSpec) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let source = find_image(&state, id)?;
        let target = format!("{}:{}", spec.repo, spec.tag);

        if let Some(holder) = state.images.iter().position(|i| i.tags.contains(&target)) {
            if holder == source {
                return Ok(());
            }
            if !spec.force {
                return Err(RuntimeError::Conflict(format!(
                    "Tag {} already refers to image {}",
                    target, state.images[holder].id
                )));
            }
            state.images[holder].tags.retain(|t| t != &target);
        }

        state.images[source].tags.push(target);
        Ok(())
    }

    async fn push_image(&self, spec: PushSpec) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let reference = match &spec.tag {
            Some(tag) => format!("{}:{}", spec.name, tag),
            None => spec.name.clone(),
        };
        if find_image(&state, &reference).is_err() {
            return Err(RuntimeError::NotFound(format!(
                "An image does not exist locally with the tag: {}",
                spec.name
            )));
        }
        if state.push_requires_auth && spec.credentials.is_none() {
            return Err(RuntimeError::AuthenticationFailure(
                "unauthorized: authentication required".to_string(),
            ));
        }
        state.pushes.push(spec);
        Ok(())
    }

    async fn create_network(&self, spec: NetworkSpec) -> RuntimeResult<String> {
        let mut state = self.state.lock();
        if spec.check_duplicate && state.networks.iter().any(|n| n.name == spec.name) {
            return Err(RuntimeError::Conflict(format!(
                "network with name {} already exists",
                spec.name
            )));
        }
        let id = new_id();
        state.networks.push(NetworkDetails {
            id: id.clone(),
            name: spec.name,
            driver: spec.driver,
        });
        Ok(id)
    }

    async fn inspect_network(&self, id: &str) -> RuntimeResult<NetworkDetails> {
        let state = self.state.lock();
        Ok(state.networks[find_network(&state, id)?].clone())
    }

    async fn list_networks(&self) -> RuntimeResult<Vec<Value>> {
        let state = self.state.lock();
        Ok(state
            .networks
            .iter()
            .map(|n| json!({"Id": n.id, "Name": n.name, "Driver": n.driver}))
            .collect())
    }

    async fn remove_network(&self, id: &str) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_network(&state, id)?;
        state.networks.remove(index);
        Ok(())
    }

    async fn create_volume(&self, spec: VolumeSpec) -> RuntimeResult<String> {
        let mut state = self.state.lock();
        if let Some(existing) = state.volumes.iter().find(|v| v.name == spec.name) {
            // Same name and driver is idempotent, as on the daemon
            if existing.driver != spec.driver {
                return Err(RuntimeError::Conflict(format!(
                    "create {}: volume name must be unique",
                    spec.name
                )));
            }
            return Ok(existing.name.clone());
        }
        state.volumes.push(VolumeDetails {
            name: spec.name.clone(),
            driver: spec.driver,
        });
        Ok(spec.name)
    }

    async fn inspect_volume(&self, name: &str) -> RuntimeResult<VolumeDetails> {
        let state = self.state.lock();
        Ok(state.volumes[find_volume(&state, name)?].clone())
    }

    async fn list_volumes(&self) -> RuntimeResult<Vec<Value>> {
        let state = self.state.lock();
        Ok(state
            .volumes
            .iter()
            .map(|v| json!({"Name": v.name, "Driver": v.driver}))
            .collect())
    }

    async fn remove_volume(&self, name: &str, _force: bool) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        let index = find_volume(&state, name)?;
        state.volumes.remove(index);
        Ok(())
    }
}
