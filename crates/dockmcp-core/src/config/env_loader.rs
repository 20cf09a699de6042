//! Environment variable-based configuration overrides

use crate::config::model::DockmcpConfig;
use crate::error::{DockmcpError, DockmcpResult};
use std::env;

/// Daemon address override
pub const ENV_DOCKER_HOST: &str = "DOCKMCP_DOCKER_HOST";
/// Standard Docker client variable, used when `DOCKMCP_DOCKER_HOST` is unset
pub const ENV_DOCKER_HOST_FALLBACK: &str = "DOCKER_HOST";
/// Docker request timeout override (seconds)
pub const ENV_DOCKER_TIMEOUT: &str = "DOCKMCP_DOCKER_TIMEOUT";
/// Default exec timeout override (seconds)
pub const ENV_EXEC_TIMEOUT: &str = "DOCKMCP_EXEC_TIMEOUT";
/// Log level override
pub const ENV_LOG_LEVEL: &str = "DOCKMCP_LOG_LEVEL";
/// Log format override
pub const ENV_LOG_FORMAT: &str = "DOCKMCP_LOG_FORMAT";

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut DockmcpConfig) -> DockmcpResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides read through `lookup`
///
/// Only variables that are present and non-empty override.
pub fn apply_overrides_from<F>(config: &mut DockmcpConfig, lookup: F) -> DockmcpResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(host) = get(ENV_DOCKER_HOST).or_else(|| get(ENV_DOCKER_HOST_FALLBACK)) {
        config.docker.host = Some(host);
    }

    if let Some(timeout) = get(ENV_DOCKER_TIMEOUT) {
        config.docker.timeout_secs = parse_secs(ENV_DOCKER_TIMEOUT, &timeout)?;
    }

    if let Some(timeout) = get(ENV_EXEC_TIMEOUT) {
        config.exec.default_timeout_secs = parse_secs(ENV_EXEC_TIMEOUT, &timeout)?;
    }

    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    if let Some(format) = get(ENV_LOG_FORMAT) {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_secs(key: &str, value: &str) -> DockmcpResult<u64> {
    value.trim().parse().map_err(|_| {
        DockmcpError::config_with_context(
            format!("Invalid {} value", key),
            format!("Parsing '{}' as a number of seconds", value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_all_overrides() {
        let mut config = DockmcpConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[
                ("DOCKMCP_DOCKER_HOST", "tcp://docker:2376"),
                ("DOCKMCP_DOCKER_TIMEOUT", "45"),
                ("DOCKMCP_EXEC_TIMEOUT", "10"),
                ("DOCKMCP_LOG_LEVEL", "debug"),
                ("DOCKMCP_LOG_FORMAT", "compact"),
            ]),
        )
        .unwrap();

        assert_eq!(config.docker.host.as_deref(), Some("tcp://docker:2376"));
        assert_eq!(config.docker.timeout_secs, 45);
        assert_eq!(config.exec.default_timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_docker_host_fallback() {
        let mut config = DockmcpConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[("DOCKER_HOST", "unix:///run/user/1000/docker.sock")]),
        )
        .unwrap();
        assert_eq!(
            config.docker.host.as_deref(),
            Some("unix:///run/user/1000/docker.sock")
        );

        let mut config = DockmcpConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[
                ("DOCKER_HOST", "unix:///ignored.sock"),
                ("DOCKMCP_DOCKER_HOST", "tcp://preferred:2375"),
            ]),
        )
        .unwrap();
        assert_eq!(config.docker.host.as_deref(), Some("tcp://preferred:2375"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let mut config = DockmcpConfig::default();
        apply_overrides_from(&mut config, lookup(&[("DOCKMCP_LOG_LEVEL", "  ")])).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = DockmcpConfig::default();
        let err = apply_overrides_from(&mut config, lookup(&[("DOCKMCP_EXEC_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("DOCKMCP_EXEC_TIMEOUT"));
    }
}
