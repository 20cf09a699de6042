//! Docker Engine implementation of the runtime facade

use super::{
    ArchiveStream, ContainerDetails, ContainerRuntime, ContainerSpec, CreatedContainer, ExecOutput, ExecSpec,
    ImageDetails, LogOptions, NetworkDetails, NetworkSpec, PushSpec, RemoveContainerOptions,
    RuntimeError, RuntimeResult, TagSpec, VolumeDetails, VolumeSpec,
};
use crate::archive;
use async_trait::async_trait;
use bollard::auth::DockerCredentials;
use bollard::container::{
    self, Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
    LogOutput, LogsOptions, StartContainerOptions, StopContainerOptions,
    UploadToContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::image::{
    BuildImageOptions, CreateImageOptions, ListImagesOptions, PushImageOptions,
    RemoveImageOptions, TagImageOptions,
};
use bollard::models::HostConfig;
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions, ListNetworksOptions};
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions, RemoveVolumeOptions};
use bollard::{API_DEFAULT_VERSION, Docker};
use bytes::Bytes;
use dockmcp_core::config::DockerConfig;
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::pin::pin;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// File name the Dockerfile gets inside the build context
const DOCKERFILE_NAME: &str = "Dockerfile";

/// Runtime backed by a Docker daemon
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect according to the configuration
    ///
    /// Without a configured host the platform defaults apply (the local
    /// socket, honoring `DOCKER_HOST`).
    pub fn connect(config: &DockerConfig) -> RuntimeResult<Self> {
        let timeout = config.timeout_secs;
        let docker = match config.host.as_deref() {
            None => Docker::connect_with_local_defaults()?.with_timeout(config.timeout()),
            Some(host) if host.starts_with("unix://") || host.starts_with("npipe://") => {
                Docker::connect_with_socket(host, timeout, API_DEFAULT_VERSION)?
            }
            Some(host) if host.starts_with("tcp://") || host.starts_with("http://") => {
                Docker::connect_with_http(host, timeout, API_DEFAULT_VERSION)?
            }
            Some(host) => {
                return Err(RuntimeError::Other(format!(
                    "Unsupported Docker host '{}' (expected unix://, npipe://, tcp:// or http://)",
                    host
                )));
            }
        };

        debug!(host = ?config.host, timeout_secs = timeout, "Docker client configured");
        Ok(Self { docker })
    }

    /// Wrap an existing client
    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }

    /// Check that the daemon answers
    pub async fn ping(&self) -> RuntimeResult<()> {
        self.docker.ping().await?;
        Ok(())
    }
}

fn to_json_list<T: Serialize>(items: Vec<T>) -> RuntimeResult<Vec<Value>> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(|e| RuntimeError::Other(e.to_string())))
        .collect()
}

fn chunk_text(message: &Bytes) -> String {
    String::from_utf8_lossy(message).into_owned()
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    #[instrument(skip(self, spec), fields(image = %spec.image))]
    async fn create_container(&self, spec: ContainerSpec) -> RuntimeResult<CreatedContainer> {
        let host_config = spec
            .host_config
            .map(serde_json::from_value::<HostConfig>)
            .transpose()
            .map_err(|e| RuntimeError::Other(format!("Invalid host_config: {}", e)))?;

        let config = Config {
            image: Some(spec.image),
            cmd: spec.cmd,
            env: spec.env,
            exposed_ports: spec.exposed_ports.map(|ports| {
                ports
                    .into_iter()
                    .map(|port| (port, HashMap::new()))
                    .collect()
            }),
            host_config,
            ..Default::default()
        };
        let options = spec.name.map(|name| CreateContainerOptions {
            name,
            platform: None,
        });

        let response = self.docker.create_container(options, config).await?;
        debug!(id = %response.id, "Container created");

        let details = self.inspect_container(&response.id).await?;
        Ok(CreatedContainer {
            id: response.id,
            name: details.name,
        })
    }

    async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerDetails> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        let config = info.config.unwrap_or_default();

        let exposed_ports = config.exposed_ports.map(|ports| {
            let mut keys: Vec<String> = ports.into_keys().collect();
            keys.sort();
            keys
        });
        let host_config = info
            .host_config
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RuntimeError::Other(e.to_string()))?;

        Ok(ContainerDetails {
            id: info.id.unwrap_or_else(|| id.to_string()),
            name: info.name.map(|name| name.trim_start_matches('/').to_string()),
            image: config.image.unwrap_or_default(),
            cmd: config.cmd,
            env: config.env,
            exposed_ports,
            host_config,
            running: info.state.and_then(|state| state.running).unwrap_or(false),
        })
    }

    async fn start_container(&self, id: &str) -> RuntimeResult<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop_container(&self, id: &str, timeout_secs: i64) -> RuntimeResult<()> {
        self.docker
            .stop_container(id, Some(StopContainerOptions { t: timeout_secs }))
            .await?;
        Ok(())
    }

    async fn remove_container(
        &self,
        id: &str,
        options: RemoveContainerOptions,
    ) -> RuntimeResult<()> {
        let options = container::RemoveContainerOptions {
            v: options.volumes,
            force: options.force,
            ..Default::default()
        };
        self.docker.remove_container(id, Some(options)).await?;
        Ok(())
    }

    async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<Value>> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };
        to_json_list(self.docker.list_containers(Some(options)).await?)
    }

    async fn container_logs(&self, id: &str, options: LogOptions) -> RuntimeResult<String> {
        let options = LogsOptions::<String> {
            stdout: options.stdout,
            stderr: options.stderr,
            timestamps: options.timestamps,
            tail: options
                .tail
                .map(|n| n.to_string())
                .unwrap_or_else(|| "all".to_string()),
            ..Default::default()
        };

        let mut stream = pin!(self.docker.logs(id, Some(options)));
        let mut logs = String::new();
        while let Some(chunk) = stream.next().await {
            logs.push_str(&chunk?.to_string());
        }
        Ok(logs)
    }

    #[instrument(skip(self, spec), fields(program = spec.cmd.first().map(String::as_str).unwrap_or("")))]
    async fn exec(&self, id: &str, spec: ExecSpec) -> RuntimeResult<ExecOutput> {
        let options = CreateExecOptions::<String> {
            cmd: Some(spec.cmd),
            attach_stdin: Some(spec.stdin.is_some()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            working_dir: spec.working_dir,
            user: spec.user,
            env: spec.env,
            ..Default::default()
        };
        let created = self.docker.create_exec(id, options).await?;

        let mut output = ExecOutput::default();
        let started = self
            .docker
            .start_exec(&created.id, Some(StartExecOptions::default()))
            .await?;

        if let StartExecResults::Attached {
            output: mut stream,
            mut input,
        } = started
        {
            if let Some(data) = spec.stdin {
                input.write_all(data.as_bytes()).await?;
                input.flush().await?;
                input.shutdown().await?;
            }
            drop(input);

            while let Some(chunk) = stream.next().await {
                match chunk? {
                    LogOutput::StdOut { message } | LogOutput::Console { message } => {
                        output.stdout.push(chunk_text(&message))
                    }
                    LogOutput::StdErr { message } => output.stderr.push(chunk_text(&message)),
                    LogOutput::StdIn { .. } => {}
                }
            }
        }

        output.exit_code = self.docker.inspect_exec(&created.id).await?.exit_code;
        Ok(output)
    }

    async fn upload_archive(
        &self,
        id: &str,
        destination: &str,
        archive: ArchiveStream,
    ) -> RuntimeResult<()> {
        debug!(destination, "Streaming archive upload");
        let options = UploadToContainerOptions {
            path: destination.to_string(),
            ..Default::default()
        };
        self.docker
            .upload_to_container_streaming(id, Some(options), archive)
            .await?;
        Ok(())
    }

    async fn build_image(&self, dockerfile: &str) -> RuntimeResult<String> {
        let context = archive::single_file_archive(DOCKERFILE_NAME, dockerfile.as_bytes())
            .map_err(|e| RuntimeError::Other(e.to_string()))?;
        let options = BuildImageOptions::<String> {
            dockerfile: DOCKERFILE_NAME.to_string(),
            rm: true,
            ..Default::default()
        };

        let mut stream = pin!(self
            .docker
            .build_image(options, None, Some(Bytes::from(context))));
        let mut image_id = None;
        while let Some(item) = stream.next().await {
            let info = item?;
            if let Some(error) = info.error {
                return Err(RuntimeError::from_stream_message(error));
            }
            if let Some(id) = info.aux.and_then(|aux| aux.id) {
                image_id = Some(id);
            }
        }

        image_id.ok_or_else(|| {
            RuntimeError::Other("Build finished without reporting an image ID".to_string())
        })
    }

    async fn pull_image(&self, reference: &str) -> RuntimeResult<String> {
        let options = CreateImageOptions {
            from_image: reference.to_string(),
            ..Default::default()
        };

        let mut stream = pin!(self.docker.create_image(Some(options), None, None));
        while let Some(item) = stream.next().await {
            let info = item?;
            if let Some(error) = info.error {
                return Err(RuntimeError::from_stream_message(error));
            }
        }

        Ok(self.inspect_image(reference).await?.id)
    }

    async fn inspect_image(&self, id: &str) -> RuntimeResult<ImageDetails> {
        let info = self.docker.inspect_image(id).await?;
        Ok(ImageDetails {
            id: info.id.unwrap_or_default(),
            repo_tags: info.repo_tags.unwrap_or_default(),
        })
    }

    async fn list_images(&self) -> RuntimeResult<Vec<Value>> {
        let options = ListImagesOptions::<String>::default();
        to_json_list(self.docker.list_images(Some(options)).await?)
    }

    async fn remove_image(&self, id: &str, force: bool, noprune: bool) -> RuntimeResult<()> {
        self.docker
            .remove_image(id, Some(RemoveImageOptions { force, noprune }), None)
            .await?;
        Ok(())
    }

    async fn tag_image(&self, id: &str, spec: TagSpec) -> RuntimeResult<()> {
        let source = self.inspect_image(id).await?;

        // The engine always moves an existing tag, so refusal is checked here.
        if !spec.force {
            let target = format!("{}:{}", spec.repo, spec.tag);
            match self.inspect_image(&target).await {
                Ok(existing) if existing.id != source.id => {
                    return Err(RuntimeError::Conflict(format!(
                        "Tag {} already refers to image {}",
                        target, existing.id
                    )));
                }
                Ok(_) | Err(RuntimeError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let options = TagImageOptions {
            repo: spec.repo,
            tag: spec.tag,
        };
        self.docker.tag_image(id, Some(options)).await?;
        Ok(())
    }

    #[instrument(skip(self, spec), fields(name = %spec.name, authenticated = spec.credentials.is_some()))]
    async fn push_image(&self, spec: PushSpec) -> RuntimeResult<()> {
        let credentials = spec.credentials.map(|creds| DockerCredentials {
            username: creds.username,
            password: creds.password,
            identitytoken: creds.identity_token,
            serveraddress: Some(creds.server_address),
            ..Default::default()
        });
        let options = spec.tag.map(|tag| PushImageOptions { tag });

        let mut stream = pin!(self.docker.push_image(&spec.name, options, credentials));
        while let Some(item) = stream.next().await {
            let info = item?;
            if let Some(error) = info.error {
                return Err(RuntimeError::from_stream_message(error));
            }
        }
        Ok(())
    }

    async fn create_network(&self, spec: NetworkSpec) -> RuntimeResult<String> {
        let options = CreateNetworkOptions {
            name: spec.name,
            driver: spec.driver,
            check_duplicate: spec.check_duplicate,
            ..Default::default()
        };
        Ok(self.docker.create_network(options).await?.id)
    }

    async fn inspect_network(&self, id: &str) -> RuntimeResult<NetworkDetails> {
        let network = self
            .docker
            .inspect_network(id, None::<InspectNetworkOptions<String>>)
            .await?;
        Ok(NetworkDetails {
            id: network.id.unwrap_or_default(),
            name: network.name.unwrap_or_default(),
            driver: network.driver.unwrap_or_default(),
        })
    }

    async fn list_networks(&self) -> RuntimeResult<Vec<Value>> {
        to_json_list(
            self.docker
                .list_networks(None::<ListNetworksOptions<String>>)
                .await?,
        )
    }

    async fn remove_network(&self, id: &str) -> RuntimeResult<()> {
        self.docker.remove_network(id).await?;
        Ok(())
    }

    async fn create_volume(&self, spec: VolumeSpec) -> RuntimeResult<String> {
        let options = CreateVolumeOptions {
            name: spec.name,
            driver: spec.driver,
            ..Default::default()
        };
        Ok(self.docker.create_volume(options).await?.name)
    }

    async fn inspect_volume(&self, name: &str) -> RuntimeResult<VolumeDetails> {
        let volume = self.docker.inspect_volume(name).await?;
        Ok(VolumeDetails {
            name: volume.name,
            driver: volume.driver,
        })
    }

    async fn list_volumes(&self) -> RuntimeResult<Vec<Value>> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;
        to_json_list(response.volumes.unwrap_or_default())
    }

    async fn remove_volume(&self, name: &str, force: bool) -> RuntimeResult<()> {
        self.docker
            .remove_volume(name, Some(RemoveVolumeOptions { force }))
            .await?;
        Ok(())
    }
}
