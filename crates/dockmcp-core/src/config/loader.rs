//! Layered configuration loading
//!
//! Sources are applied in the order they were added: defaults, then the
//! config file, then the environment, then explicit overrides (CLI flags).

use crate::config::env_loader::apply_env_overrides;
use crate::config::file_loader::load_from_file;
use crate::config::model::DockmcpConfig;
use crate::error::DockmcpResult;
use std::path::{Path, PathBuf};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file
    File(PathBuf),
    /// Configuration from environment variables
    Environment,
    /// Explicit values, usually from command line flags
    Overrides(ConfigOverrides),
}

/// Values that replace whatever earlier sources produced
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Daemon address
    pub docker_host: Option<String>,
    /// Docker request timeout in seconds
    pub docker_timeout_secs: Option<u64>,
    /// Default exec timeout in seconds
    pub exec_timeout_secs: Option<u64>,
    /// Log level
    pub log_level: Option<String>,
    /// Log format
    pub log_format: Option<String>,
}

impl ConfigOverrides {
    /// Apply the present values to a configuration
    pub fn apply(&self, config: &mut DockmcpConfig) {
        if let Some(host) = &self.docker_host {
            config.docker.host = Some(host.clone());
        }
        if let Some(secs) = self.docker_timeout_secs {
            config.docker.timeout_secs = secs;
        }
        if let Some(secs) = self.exec_timeout_secs {
            config.exec.default_timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
    }
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add explicit overrides
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        self.add_source(ConfigSource::Overrides(overrides))
    }

    /// Load configuration from all sources and validate it
    pub fn load(self) -> DockmcpResult<DockmcpConfig> {
        let mut config = DockmcpConfig::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!(path = %path.display(), "Loading config file");
                    config.merge(load_from_file(&path)?);
                }
                ConfigSource::Environment => apply_env_overrides(&mut config)?,
                ConfigSource::Overrides(overrides) => overrides.apply(&mut config),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from an optional file, the environment, and overrides
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> DockmcpResult<DockmcpConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.with_env().with_overrides(overrides).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dockmcp.toml");
        fs::write(
            &path,
            "[exec]\ndefault_timeout_secs = 30\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_file(&path)
            .with_overrides(ConfigOverrides {
                exec_timeout_secs: Some(5),
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.exec.default_timeout_secs, 5);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        let result = ConfigLoader::new()
            .with_overrides(ConfigOverrides {
                log_format: Some("xml".into()),
                ..Default::default()
            })
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_no_sources_gives_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.docker.timeout_secs, 120);
        assert_eq!(config.exec.default_timeout_secs, 60);
    }
}
