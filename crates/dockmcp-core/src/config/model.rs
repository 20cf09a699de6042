//! Configuration data models

use crate::config::logging_config::LoggingConfig;
use crate::error::{DockmcpError, DockmcpResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for Docker API requests
pub const DEFAULT_DOCKER_TIMEOUT_SECS: u64 = 120;

/// Default timeout for `exec_container` when the caller gives none
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 60;

/// Top-level dockmcp configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DockmcpConfig {
    /// Docker daemon connection
    pub docker: DockerConfig,
    /// Command execution defaults
    pub exec: ExecConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Docker daemon connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Daemon address (`unix://`, `tcp://`, `http://`); `None` uses the local defaults
    pub host: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: None,
            timeout_secs: DEFAULT_DOCKER_TIMEOUT_SECS,
        }
    }
}

impl DockerConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Command execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Timeout applied to exec calls without an explicit `timeout`
    pub default_timeout_secs: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_EXEC_TIMEOUT_SECS,
        }
    }
}

impl DockmcpConfig {
    /// Validate the configuration
    pub fn validate(&self) -> DockmcpResult<()> {
        if self.docker.timeout_secs == 0 {
            return Err(DockmcpError::config("Docker timeout must be greater than 0"));
        }

        if self.exec.default_timeout_secs == 0 {
            return Err(DockmcpError::config(
                "Exec default timeout must be greater than 0",
            ));
        }

        if let Some(host) = &self.docker.host {
            if host.trim().is_empty() {
                return Err(DockmcpError::config("Docker host cannot be empty"));
            }
        }

        self.logging.validate()
    }

    /// Merge another configuration on top of this one
    ///
    /// Values equal to the defaults in `other` do not override.
    pub fn merge(&mut self, other: DockmcpConfig) {
        if other.docker.host.is_some() {
            self.docker.host = other.docker.host;
        }

        if other.docker.timeout_secs != DEFAULT_DOCKER_TIMEOUT_SECS {
            self.docker.timeout_secs = other.docker.timeout_secs;
        }

        if other.exec.default_timeout_secs != DEFAULT_EXEC_TIMEOUT_SECS {
            self.exec.default_timeout_secs = other.exec.default_timeout_secs;
        }

        self.logging.merge(other.logging);
    }
}
