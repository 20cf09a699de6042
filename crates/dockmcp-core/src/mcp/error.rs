//! MCP error types

use super::protocol::McpRpcError;
use thiserror::Error;

/// MCP-specific errors
#[derive(Debug, Error, Clone)]
pub enum McpError {
    /// Transport error (reading or writing the stream)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed message or unexpected envelope
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Method is not served
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Request parameters did not have the expected shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl McpError {
    /// JSON-RPC error object to send back for this error
    pub fn to_rpc_error(&self) -> McpRpcError {
        match self {
            McpError::MethodNotFound(method) => {
                McpRpcError::method_not_found().with_data(serde_json::json!({ "method": method }))
            }
            McpError::InvalidParams(message) => McpRpcError::new(-32602, message.clone()),
            McpError::Protocol(message) => McpRpcError::new(-32600, message.clone()),
            McpError::Serialization(_) => McpRpcError::parse_error(),
            McpError::Transport(message) => McpRpcError::new(-32603, message.clone()),
        }
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        assert_eq!(
            McpError::MethodNotFound("resources/list".into())
                .to_rpc_error()
                .code,
            -32601
        );
        assert_eq!(
            McpError::InvalidParams("missing name".into())
                .to_rpc_error()
                .code,
            -32602
        );
        assert_eq!(McpError::Serialization("eof".into()).to_rpc_error().code, -32700);
    }
}
