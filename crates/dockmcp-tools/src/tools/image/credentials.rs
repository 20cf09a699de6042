//! Registry credentials from the Docker CLI configuration
//!
//! Only the static `auths` section of `config.json` is read. Credential
//! helpers (`credsStore`, `credHelpers`) are never executed.

use crate::runtime::RegistryCredentials;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Server address used for Docker Hub
pub const DOCKER_HUB_REGISTRY: &str = "https://index.docker.io/v1/";

const DOCKER_HUB_ALIASES: &[&str] = &[
    "index.docker.io",
    "docker.io",
    "registry-1.docker.io",
];

#[derive(Debug, Default, Deserialize)]
struct DockerConfigFile {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    auth: Option<String>,
    username: Option<String>,
    password: Option<String>,
    identitytoken: Option<String>,
}

/// Registry an image reference belongs to
///
/// The first path component names a registry when it contains `.` or `:`
/// or is `localhost`; everything else lives on Docker Hub.
pub fn registry_for(image: &str) -> String {
    match image.split_once('/') {
        Some((first, _))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            first.to_string()
        }
        _ => DOCKER_HUB_REGISTRY.to_string(),
    }
}

/// `https://host/v1/` and `host` both become `host`
fn normalize_server(server: &str) -> &str {
    let server = server
        .strip_prefix("https://")
        .or_else(|| server.strip_prefix("http://"))
        .unwrap_or(server);
    server.split('/').next().unwrap_or(server)
}

fn is_docker_hub(host: &str) -> bool {
    DOCKER_HUB_ALIASES.contains(&host)
}

/// Lookup of push credentials in a Docker CLI config file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    config_path: Option<PathBuf>,
}

impl CredentialStore {
    /// `$DOCKER_CONFIG/config.json`, or `~/.docker/config.json`
    pub fn from_env() -> Self {
        let config_path = std::env::var_os("DOCKER_CONFIG")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".docker")))
            .map(|dir| dir.join("config.json"));
        Self { config_path }
    }

    /// Read a specific config file
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// A store that never yields credentials
    pub fn empty() -> Self {
        Self { config_path: None }
    }

    /// Credentials for the registry of `image`, if any are usable
    pub async fn lookup(&self, image: &str) -> Option<RegistryCredentials> {
        let path = self.config_path.as_ref()?;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No Docker config to read");
                return None;
            }
        };
        let config: DockerConfigFile = match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable Docker config");
                return None;
            }
        };

        let registry = registry_for(image);
        let wanted = normalize_server(&registry);
        let (server, entry) = config.auths.iter().find(|(server, _)| {
            let host = normalize_server(server);
            host == wanted || (is_docker_hub(wanted) && is_docker_hub(host))
        })?;

        credentials_from_entry(&registry, server, entry)
    }
}

fn credentials_from_entry(
    registry: &str,
    server: &str,
    entry: &AuthEntry,
) -> Option<RegistryCredentials> {
    let mut credentials = RegistryCredentials {
        server_address: registry.to_string(),
        username: entry.username.clone(),
        password: entry.password.clone(),
        identity_token: entry.identitytoken.clone(),
    };

    if let Some(encoded) = entry.auth.as_deref().filter(|a| !a.is_empty()) {
        let decoded = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        match decoded.as_deref().and_then(|pair| pair.split_once(':')) {
            Some((username, password)) => {
                credentials.username = Some(username.to_string());
                credentials.password = Some(password.to_string());
            }
            None => warn!(server, "Malformed auth entry in Docker config"),
        }
    }

    let usable = credentials.identity_token.is_some()
        || (credentials.username.is_some() && credentials.password.is_some());
    usable.then_some(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(config: serde_json::Value) -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, config.to_string()).unwrap();
        (dir, CredentialStore::at(path))
    }

    #[test]
    fn test_registry_for() {
        assert_eq!(registry_for("alice/app"), DOCKER_HUB_REGISTRY);
        assert_eq!(registry_for("app"), DOCKER_HUB_REGISTRY);
        assert_eq!(registry_for("ghcr.io/alice/app"), "ghcr.io");
        assert_eq!(registry_for("localhost:5000/app"), "localhost:5000");
        assert_eq!(registry_for("localhost/app"), "localhost");
    }

    #[tokio::test]
    async fn test_hub_auth_is_decoded() {
        let auth = STANDARD.encode("alice:s3cret");
        let (_dir, store) = store(json!({
            "auths": {"https://index.docker.io/v1/": {"auth": auth}}
        }));

        let creds = store.lookup("alice/app").await.unwrap();
        assert_eq!(creds.username.as_deref(), Some("alice"));
        assert_eq!(creds.password.as_deref(), Some("s3cret"));
        assert_eq!(creds.server_address, DOCKER_HUB_REGISTRY);
    }

    #[tokio::test]
    async fn test_private_registry_match() {
        let (_dir, store) = store(json!({
            "auths": {
                "https://index.docker.io/v1/": {"auth": STANDARD.encode("hub:pw")},
                "registry.example.com": {"username": "ci", "password": "token"}
            }
        }));

        let creds = store.lookup("registry.example.com/team/app").await.unwrap();
        assert_eq!(creds.username.as_deref(), Some("ci"));
        assert!(store.lookup("ghcr.io/team/app").await.is_none());
    }

    #[tokio::test]
    async fn test_helpers_and_empty_entries_are_unusable() {
        let (_dir, store) = store(json!({
            "auths": {"https://index.docker.io/v1/": {}},
            "credsStore": "desktop"
        }));
        assert!(store.lookup("alice/app").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_or_invalid_file() {
        let dir = TempDir::new().unwrap();
        assert!(CredentialStore::at(dir.path().join("none.json")).lookup("a/b").await.is_none());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(CredentialStore::at(path).lookup("a/b").await.is_none());
        assert!(CredentialStore::empty().lookup("a/b").await.is_none());
    }
}
