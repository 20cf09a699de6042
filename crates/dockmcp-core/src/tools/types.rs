//! Tool-related type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A tool invocation received from the protocol layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool, untyped until validated
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(
        id: S,
        name: S,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Create a tool call from a JSON object of arguments
    ///
    /// Anything other than an object is treated as an empty argument map.
    pub fn from_json(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };

        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of a tool execution
///
/// Every invocation produces exactly one of these. Handlers never build it
/// directly; the dispatcher wraps their text output or error.
///
/// - `success`: whether the tool execution succeeded
/// - `output`: the response text (present on success)
/// - `error`: the error text (present on failure)
/// - `metadata`: structured extras, including `error_kind` on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool call ID this result corresponds to
    pub call_id: String,
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the tool execution was successful
    pub success: bool,
    /// Output from the tool (if successful)
    pub output: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Execution time in milliseconds
    pub execution_time_ms: Option<u64>,
    /// Additional metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            execution_time_ms: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a failed tool result
    pub fn error(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error.into()),
            execution_time_ms: None,
            metadata: HashMap::new(),
        }
    }

    /// Add execution time
    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }

    /// Add metadata
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The text to hand back to the caller, success or not
    pub fn text(&self) -> &str {
        if self.success {
            self.output.as_deref().unwrap_or_default()
        } else {
            self.error.as_deref().unwrap_or_default()
        }
    }

    /// Classification code of a failed result, if any
    pub fn error_kind(&self) -> Option<&str> {
        self.metadata.get("error_kind").and_then(|v| v.as_str())
    }
}

/// Declared type of a tool parameter
///
/// This is a closed set; the validator never falls back to guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Boolean,
    Integer,
    Object,
    Array,
}

impl ParameterType {
    /// JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Boolean => "boolean",
            ParameterType::Integer => "integer",
            ParameterType::Object => "object",
            ParameterType::Array => "array",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Declared parameter type
    pub param_type: ParameterType,
    /// Element type for array parameters
    pub items: Option<ParameterType>,
    /// Whether this parameter is required
    pub required: bool,
    /// Default value applied when an optional parameter is omitted
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    fn new<S: Into<String>>(name: S, description: S, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
            items: None,
            required: true,
            default: None,
        }
    }

    /// Create a required string parameter
    pub fn string<S: Into<String>>(name: S, description: S) -> Self {
        Self::new(name, description, ParameterType::String)
    }

    /// Create an optional string parameter
    pub fn optional_string<S: Into<String>>(name: S, description: S) -> Self {
        Self::new(name, description, ParameterType::String).optional()
    }

    /// Create a boolean parameter
    pub fn boolean<S: Into<String>>(name: S, description: S) -> Self {
        Self::new(name, description, ParameterType::Boolean)
    }

    /// Create an integer parameter
    pub fn integer<S: Into<String>>(name: S, description: S) -> Self {
        Self::new(name, description, ParameterType::Integer)
    }

    /// Create an object parameter
    pub fn object<S: Into<String>>(name: S, description: S) -> Self {
        Self::new(name, description, ParameterType::Object)
    }

    /// Create an array-of-strings parameter
    pub fn string_array<S: Into<String>>(name: S, description: S) -> Self {
        let mut param = Self::new(name, description, ParameterType::Array);
        param.items = Some(ParameterType::String);
        param
    }

    /// Make parameter optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set default value
    pub fn with_default<V: Into<serde_json::Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    fn json_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::Map::new();
        schema.insert("type".to_string(), self.param_type.as_str().into());
        schema.insert("description".to_string(), self.description.clone().into());

        if let Some(items) = self.items {
            schema.insert(
                "items".to_string(),
                serde_json::json!({ "type": items.as_str() }),
            );
        }

        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }

        schema.into()
    }
}

/// Declared definition of a tool: name, description and ordered parameters
///
/// Immutable once the tool is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Parameters in declaration order
    pub parameters: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Create a new tool schema
    pub fn new<S: Into<String>>(name: S, description: S, parameters: Vec<ToolParameter>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Render the parameter list as a JSON Schema object
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            if param.required {
                required.push(param.name.clone());
            }
            properties.insert(param.name.clone(), param.json_schema());
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}
