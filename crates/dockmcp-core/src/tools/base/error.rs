//! Error types for tool operations

use crate::error::DockmcpError;

/// Error type for tool operations
///
/// Resource variants carry the full user-facing message so the text a caller
/// sees is exactly what the handler wrote.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments provided to the tool
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Argument validation against the declared schema failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Tool is not registered
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Referenced container, image, network, volume or path is absent
    #[error("{0}")]
    ResourceNotFound(String),

    /// Name collision on create
    #[error("{0}")]
    Conflict(String),

    /// Registry credentials were missing or rejected
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The operation did not finish within its wait window
    #[error("{0}")]
    Timeout(String),

    /// Tool execution failed
    #[error("{0}")]
    ExecutionFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl ToolError {
    /// Stable classification code attached to failed results
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::InvalidArguments(_) => "TOOL_INVALID_ARGS",
            ToolError::ValidationFailed(_) => "TOOL_VALIDATION_FAILED",
            ToolError::NotFound(_) => "TOOL_NOT_FOUND",
            ToolError::ResourceNotFound(_) => "TOOL_RESOURCE_NOT_FOUND",
            ToolError::Conflict(_) => "TOOL_CONFLICT",
            ToolError::AuthenticationFailed(_) => "TOOL_AUTH_FAILED",
            ToolError::Timeout(_) => "TOOL_TIMEOUT",
            ToolError::ExecutionFailed(_) => "TOOL_EXEC_FAILED",
            ToolError::Io(_) => "TOOL_IO_ERROR",
            ToolError::Json(_) => "TOOL_JSON_ERROR",
            ToolError::Other(_) => "TOOL_OTHER",
        }
    }

    /// Whether retrying the same call could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Timeout(_) | ToolError::Io(_))
    }
}

impl From<ToolError> for DockmcpError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(name) => DockmcpError::tool(name, "Tool not found"),
            other => DockmcpError::tool("unknown", other.to_string()),
        }
    }
}
