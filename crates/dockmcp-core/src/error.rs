//! Error types for dockmcp

use thiserror::Error;

/// Result type alias for dockmcp operations
pub type DockmcpResult<T> = Result<T, DockmcpError>;

/// Main error type for dockmcp
#[derive(Error, Debug, Clone)]
pub enum DockmcpError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool execution errors
    #[error("Tool error: {tool_name}: {message}")]
    Tool { tool_name: String, message: String },

    /// Protocol errors
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl DockmcpError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration error that records what was being done
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config(format!("{} ({})", message.into(), context.into()))
    }

    /// Create a new tool error
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DockmcpError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for DockmcpError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<crate::mcp::McpError> for DockmcpError {
    fn from(error: crate::mcp::McpError) -> Self {
        Self::Protocol(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_context() {
        let err = DockmcpError::config_with_context("bad value", "reading docker.host");
        assert_eq!(
            err.to_string(),
            "Configuration error: bad value (reading docker.host)"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DockmcpError = io.into();
        assert!(matches!(err, DockmcpError::Io(_)));
    }
}
