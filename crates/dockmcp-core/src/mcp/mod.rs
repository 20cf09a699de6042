//! Model Context Protocol (MCP) server support
//!
//! dockmcp speaks the server side of MCP: a client sends newline-delimited
//! JSON-RPC 2.0 messages and receives tool listings and tool results.
//!
//! - [`McpServer`] - Serves a [`ToolExecutor`](crate::tools::ToolExecutor)
//! - [`protocol`] - JSON-RPC envelopes
//! - [`types`] - Payloads for the tools capability

pub mod error;
pub mod protocol;
pub mod server;
pub mod types;

pub use error::McpError;
pub use protocol::{
    JSONRPC_VERSION, MCP_PROTOCOL_VERSION, McpMessage, McpNotification, McpRequest, McpResponse,
    McpRpcError, RequestId,
};
pub use server::McpServer;
pub use types::{
    CallToolParams, InitializeResult, McpCapabilities, McpContent, McpServerInfo, McpTool,
    McpToolResult, ToolCapabilities,
};
