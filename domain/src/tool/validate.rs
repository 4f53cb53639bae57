//! Tool call validation
//!
//! Pure domain logic that checks a model-issued [`ToolCall`] against its
//! [`ToolDefinition`] before the permission check, so malformed calls never
//! reach an approval prompt.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of [`ToolValidator`]
///
/// Checks required parameters are present, rejects parameters the schema
/// does not name, and enforces the declared type hints for `number` and
/// `boolean` parameters.
#[derive(Debug, Clone, Default)]
pub struct CallValidator;

impl ToolValidator for CallValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        let known: std::collections::HashMap<&str, &str> = definition
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.param_type.as_str()))
            .collect();

        for (arg_name, value) in &call.arguments {
            let Some(param_type) = known.get(arg_name.as_str()) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            };

            let type_ok = match *param_type {
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                // string, path and friends are all carried as JSON strings
                _ => value.is_string(),
            };
            if !type_ok {
                return Err(format!(
                    "Parameter '{}' for tool '{}' must be a {}",
                    arg_name, definition.name, param_type
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCategory, ToolParameter};

    fn definition() -> ToolDefinition {
        ToolDefinition::new("test", "test tool", ToolCategory::System, false)
            .with_parameter(ToolParameter::new("path", "A required path", true).with_type("path"))
            .with_parameter(ToolParameter::new("limit", "A count", false).with_type("number"))
            .with_parameter(ToolParameter::new("force", "A flag", false).with_type("boolean"))
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("test");
        let result = CallValidator.validate(&call, &definition());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("test")
            .with_arg("path", "/tmp/x")
            .with_arg("unknown_param", "value");
        let result = CallValidator.validate(&call, &definition());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown parameter"));
    }

    #[test]
    fn test_validator_type_mismatch() {
        let call = ToolCall::new("test")
            .with_arg("path", "/tmp/x")
            .with_arg("limit", "not-a-number");
        let result = CallValidator.validate(&call, &definition());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("must be a number"));
    }

    #[test]
    fn test_validator_valid_call() {
        let call = ToolCall::new("test")
            .with_arg("path", "/tmp/x")
            .with_arg("limit", 10)
            .with_arg("force", true);
        assert!(CallValidator.validate(&call, &definition()).is_ok());
    }
}
