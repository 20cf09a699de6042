//! Mapping of runtime failures to caller-facing tool errors

use crate::runtime::{
    ContainerDetails, ContainerRuntime, ImageDetails, NetworkDetails, RuntimeError, VolumeDetails,
};
use dockmcp_core::tools::ToolError;
use serde::Serialize;

/// Caller-facing text for each way an operation can fail
///
/// Every classification without dedicated text falls back to
/// `Error <operation>: <runtime message>`, keeping its classification.
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    operation: &'static str,
    not_found: Option<String>,
    conflict: Option<String>,
    authentication: Option<String>,
}

impl Failure {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            not_found: None,
            conflict: None,
            authentication: None,
        }
    }

    pub(crate) fn not_found(mut self, text: impl Into<String>) -> Self {
        self.not_found = Some(text.into());
        self
    }

    pub(crate) fn conflict(mut self, text: impl Into<String>) -> Self {
        self.conflict = Some(text.into());
        self
    }

    pub(crate) fn authentication(mut self, text: impl Into<String>) -> Self {
        self.authentication = Some(text.into());
        self
    }

    /// Generic `Error <operation>: <message>` text
    pub(crate) fn generic(&self, message: impl std::fmt::Display) -> String {
        format!("Error {}: {}", self.operation, message)
    }

    pub(crate) fn map(&self, err: RuntimeError) -> ToolError {
        let pick = |text: &Option<String>| {
            text.clone()
                .unwrap_or_else(|| self.generic(err.message()))
        };
        match &err {
            RuntimeError::NotFound(_) => ToolError::ResourceNotFound(pick(&self.not_found)),
            RuntimeError::Conflict(_) => ToolError::Conflict(pick(&self.conflict)),
            RuntimeError::AuthenticationFailure(_) => {
                ToolError::AuthenticationFailed(pick(&self.authentication))
            }
            RuntimeError::Timeout(message) => ToolError::Timeout(self.generic(message)),
            RuntimeError::Other(message) => ToolError::ExecutionFailed(self.generic(message)),
        }
    }

    /// Failure unrelated to the runtime, e.g. a local I/O error
    pub(crate) fn other(&self, message: impl std::fmt::Display) -> ToolError {
        ToolError::ExecutionFailed(self.generic(message))
    }
}

pub(crate) async fn resolve_container(
    runtime: &dyn ContainerRuntime,
    id: &str,
    failure: &Failure,
) -> Result<ContainerDetails, ToolError> {
    runtime
        .inspect_container(id)
        .await
        .map_err(|e| failure.map(e))
}

pub(crate) async fn resolve_image(
    runtime: &dyn ContainerRuntime,
    id: &str,
    failure: &Failure,
) -> Result<ImageDetails, ToolError> {
    runtime.inspect_image(id).await.map_err(|e| failure.map(e))
}

pub(crate) async fn resolve_network(
    runtime: &dyn ContainerRuntime,
    id: &str,
    failure: &Failure,
) -> Result<NetworkDetails, ToolError> {
    runtime.inspect_network(id).await.map_err(|e| failure.map(e))
}

pub(crate) async fn resolve_volume(
    runtime: &dyn ContainerRuntime,
    name: &str,
    failure: &Failure,
) -> Result<VolumeDetails, ToolError> {
    runtime.inspect_volume(name).await.map_err(|e| failure.map(e))
}

/// Render list output
pub(crate) fn pretty_json<T: Serialize>(value: &T, failure: &Failure) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| failure.other(e))
}

/// Split `repo[:tag]`, treating a colon before the last `/` as a registry port
pub(crate) fn split_reference(reference: &str) -> (String, Option<String>) {
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].rfind(':') {
        Some(offset) => {
            let split = name_start + offset;
            (
                reference[..split].to_string(),
                Some(reference[split + 1..].to_string()),
            )
        }
        None => (reference.to_string(), None),
    }
}
