//! Tool system for dockmcp

pub mod base;
pub mod executor;
pub mod registry;
pub mod types;
pub mod validation;

pub use base::{Tool, ToolError};
pub use executor::ToolExecutor;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use types::{ParameterType, ToolCall, ToolParameter, ToolResult, ToolSchema};
pub use validation::{ToolArguments, validate_arguments, validate_call};
