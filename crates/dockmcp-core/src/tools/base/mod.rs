//! Base trait and types for tools
//!
//! - [`Tool`] - The trait every tool implements
//! - [`ToolError`] - Classified errors returned by tools
//!
//! # Examples
//!
//! ```no_run
//! use dockmcp_core::tools::{Tool, ToolArguments, ToolError, ToolParameter, ToolSchema};
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Tool for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     fn description(&self) -> &str { "Echo a message" }
//!     fn schema(&self) -> ToolSchema {
//!         ToolSchema::new(self.name(), self.description(), vec![
//!             ToolParameter::string("message", "Text to echo"),
//!         ])
//!     }
//!     async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
//!         Ok(args.require_string("message")?.to_string())
//!     }
//! }
//! ```

pub mod error;
pub mod tool_trait;


pub use error::ToolError;
pub use tool_trait::Tool;
