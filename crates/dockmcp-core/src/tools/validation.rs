//! Argument validation against a declared tool schema
//!
//! Turns the untyped argument map of a [`ToolCall`] into [`ToolArguments`]:
//! required parameters are checked in declaration order, declared types are
//! enforced without coercion, and defaults are filled in for omitted optional
//! parameters.

use super::base::ToolError;
use super::types::{ParameterType, ToolCall, ToolSchema};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Arguments that passed schema validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: HashMap<String, Value>,
}

impl ToolArguments {
    /// Raw value of an argument, if present after defaults were applied
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an argument is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Optional string argument
    pub fn string(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// String argument that is required or has a schema default
    pub fn require_string(&self, name: &str) -> Result<&str, ToolError> {
        self.string(name).ok_or_else(|| missing(name))
    }

    /// Optional boolean argument
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// Boolean argument that is required or has a schema default
    pub fn require_bool(&self, name: &str) -> Result<bool, ToolError> {
        self.bool(name).ok_or_else(|| missing(name))
    }

    /// Optional integer argument
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(as_integer)
    }

    /// Integer argument that is required or has a schema default
    pub fn require_integer(&self, name: &str) -> Result<i64, ToolError> {
        self.integer(name).ok_or_else(|| missing(name))
    }

    /// Optional object argument
    pub fn object(&self, name: &str) -> Option<&serde_json::Map<String, Value>> {
        self.values.get(name).and_then(Value::as_object)
    }

    /// Optional array-of-strings argument
    pub fn string_list(&self, name: &str) -> Option<Vec<String>> {
        self.values.get(name).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }
}

fn missing(name: &str) -> ToolError {
    ToolError::InvalidArguments(format!("Missing '{}' parameter", name))
}

/// Validate a call's arguments against a schema
///
/// Fails with [`ToolError::ValidationFailed`] naming the first missing
/// required parameter, or the first parameter whose value has the wrong type.
pub fn validate_arguments(
    schema: &ToolSchema,
    arguments: &HashMap<String, Value>,
) -> Result<ToolArguments, ToolError> {
    let mut values = HashMap::with_capacity(schema.parameters.len());

    for param in &schema.parameters {
        match arguments.get(&param.name) {
            Some(value) if !value.is_null() => {
                let value = check_type(&param.name, param.param_type, param.items, value)?;
                values.insert(param.name.clone(), value);
            }
            _ if param.required => {
                return Err(ToolError::ValidationFailed(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
            _ => {
                if let Some(default) = &param.default {
                    values.insert(param.name.clone(), default.clone());
                }
            }
        }
    }

    for name in arguments.keys() {
        if schema.parameter(name).is_none() {
            debug!(tool = %schema.name, argument = %name, "Ignoring undeclared argument");
        }
    }

    Ok(ToolArguments { values })
}

/// Validate the arguments carried by a tool call
pub fn validate_call(schema: &ToolSchema, call: &ToolCall) -> Result<ToolArguments, ToolError> {
    validate_arguments(schema, &call.arguments)
}

fn check_type(
    name: &str,
    expected: ParameterType,
    items: Option<ParameterType>,
    value: &Value,
) -> Result<Value, ToolError> {
    let matches = match expected {
        ParameterType::String => value.is_string(),
        ParameterType::Boolean => value.is_boolean(),
        ParameterType::Integer => as_integer(value).is_some(),
        ParameterType::Object => value.is_object(),
        ParameterType::Array => value.is_array(),
    };

    if !matches {
        return Err(ToolError::ValidationFailed(format!(
            "Parameter '{}' must be of type {}, got {}",
            name,
            expected,
            json_type_name(value)
        )));
    }

    if expected == ParameterType::Integer {
        // Integral floats such as 5.0 are normalized so handlers see an i64
        return as_integer(value)
            .map(Value::from)
            .ok_or_else(|| ToolError::ValidationFailed(format!("Parameter '{}' is not an integer", name)));
    }

    if let (ParameterType::Array, Some(item_type), Some(elements)) =
        (expected, items, value.as_array())
    {
        for (index, element) in elements.iter().enumerate() {
            check_type(&format!("{}[{}]", name, index), item_type, None, element)?;
        }
    }

    Ok(value.clone())
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::ToolParameter;
    use serde_json::json;

    fn exec_schema() -> ToolSchema {
        ToolSchema::new(
            "exec_container",
            "Execute a command",
            vec![
                ToolParameter::string("id", "Container ID or name"),
                ToolParameter::string("cmd", "Command to execute"),
                ToolParameter::string_array("env", "KEY=VALUE pairs").optional(),
                ToolParameter::integer("timeout", "Timeout in seconds")
                    .optional()
                    .with_default(60),
                ToolParameter::object("host_config", "Host configuration").optional(),
            ],
        )
    }

    fn args(value: Value) -> HashMap<String, Value> {
        value
            .as_object()
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_first_missing_required_is_named() {
        let err = validate_arguments(&exec_schema(), &args(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Missing required parameter: id");

        let err = validate_arguments(&exec_schema(), &args(json!({"id": "web"}))).unwrap_err();
        assert!(err.to_string().contains("cmd"));
    }

    #[test]
    fn test_defaults_applied_and_optional_absent() {
        let validated =
            validate_arguments(&exec_schema(), &args(json!({"id": "web", "cmd": "ls"}))).unwrap();

        assert_eq!(validated.integer("timeout"), Some(60));
        assert_eq!(validated.require_integer("timeout").unwrap(), 60);
        assert!(!validated.contains("env"));
        assert!(!validated.contains("host_config"));
    }

    #[test]
    fn test_require_accessors_report_absent_values() {
        let schema = ToolSchema::new(
            "remove_volume",
            "Remove a volume",
            vec![
                ToolParameter::string("name", "Volume name"),
                ToolParameter::boolean("force", "Force removal")
                    .optional()
                    .with_default(false),
            ],
        );
        let validated = validate_arguments(&schema, &args(json!({"name": "cache"}))).unwrap();

        assert!(!validated.require_bool("force").unwrap());
        let err = validated.require_integer("timeout").unwrap_err();
        assert_eq!(err.error_code(), "TOOL_INVALID_ARGS");
    }

    #[test]
    fn test_null_counts_as_omitted() {
        let validated = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "ls", "timeout": null})),
        )
        .unwrap();
        assert_eq!(validated.integer("timeout"), Some(60));

        let err = validate_arguments(&exec_schema(), &args(json!({"id": null, "cmd": "ls"})))
            .unwrap_err();
        assert!(matches!(err, ToolError::ValidationFailed(_)));
    }

    #[test]
    fn test_string_is_not_coerced_to_object() {
        let err = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "ls", "host_config": "{\"Binds\": []}"})),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: Parameter 'host_config' must be of type object, got string"
        );
    }

    #[test]
    fn test_integer_accepts_integral_float_only() {
        let validated = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "ls", "timeout": 5.0})),
        )
        .unwrap();
        assert_eq!(validated.get("timeout"), Some(&json!(5)));

        assert!(
            validate_arguments(
                &exec_schema(),
                &args(json!({"id": "web", "cmd": "ls", "timeout": 5.5}))
            )
            .is_err()
        );
        assert!(
            validate_arguments(
                &exec_schema(),
                &args(json!({"id": "web", "cmd": "ls", "timeout": "5"}))
            )
            .is_err()
        );
    }

    #[test]
    fn test_array_items_are_checked() {
        let err = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "env", "env": ["A=1", 2]})),
        )
        .unwrap_err();
        assert!(err.to_string().contains("env[1]"));

        let validated = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "env", "env": ["A=1", "B=2"]})),
        )
        .unwrap();
        assert_eq!(
            validated.string_list("env"),
            Some(vec!["A=1".to_string(), "B=2".to_string()])
        );
    }

    #[test]
    fn test_undeclared_arguments_are_ignored() {
        let validated = validate_arguments(
            &exec_schema(),
            &args(json!({"id": "web", "cmd": "ls", "verbose": true})),
        )
        .unwrap();
        assert!(!validated.contains("verbose"));
        assert_eq!(validated.require_string("id").unwrap(), "web");
    }
}
