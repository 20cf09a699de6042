//! Configuration for dockmcp
//!
//! Defaults, an optional TOML/YAML/JSON file, `DOCKMCP_*` environment
//! variables and command line flags, applied in that order.

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod logging_config;
pub mod model;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, ConfigOverrides, ConfigSource, load_config};
pub use logging_config::LoggingConfig;
pub use model::{
    DEFAULT_DOCKER_TIMEOUT_SECS, DEFAULT_EXEC_TIMEOUT_SECS, DockerConfig, DockmcpConfig,
    ExecConfig,
};
