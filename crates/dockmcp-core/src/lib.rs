//! dockmcp core library
//!
//! Runtime-agnostic building blocks for the dockmcp server: the [`Tool`]
//! trait and its parameter schemas, argument validation, the registry and
//! dispatcher, configuration loading, and the MCP server loop.

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigOverrides, DockmcpConfig, LoggingConfig, load_config};
pub use error::{DockmcpError, DockmcpResult};
pub use mcp::{McpServer, McpServerInfo};
pub use tools::{
    ParameterType, Tool, ToolArguments, ToolCall, ToolError, ToolExecutor, ToolParameter,
    ToolRegistry, ToolResult, ToolSchema,
};
