//! Tool definition types for LLM tool use
//!
//! Tools are also how structured output is obtained: define a tool whose
//! input schema is the desired output shape, force a call to it, and
//! deserialize the arguments the model supplies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helper module to build JSON schemas for tools
pub mod schema {
    use serde_json::{Value, json};

    /// Create a JSON schema for an object with properties
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// String property schema restricted to an enumerated set of values
    pub fn string_enum(description: &str, values: &[&str]) -> Value {
        json!({
            "type": "string",
            "description": description,
            "enum": values,
        })
    }

    /// Number property schema
    pub fn number(description: &str) -> Value {
        json!({
            "type": "number",
            "description": description,
        })
    }

    /// Number property schema bounded to an inclusive range
    pub fn number_range(description: &str, minimum: f64, maximum: f64) -> Value {
        json!({
            "type": "number",
            "description": description,
            "minimum": minimum,
            "maximum": maximum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_creation() {
        let schema = schema::object(
            json!({
                "recommendation": schema::string_enum("Final call", &["Buy", "Hold", "Sell"]),
            }),
            vec!["recommendation"],
        );

        let tool = ToolDefinition::new("submit_recommendation", "Submit the call", schema.clone());
        assert_eq!(tool.name, "submit_recommendation");
        assert_eq!(tool.input_schema, schema);
    }

    #[test]
    fn test_schema_builders() {
        let str_schema = schema::string("test");
        assert_eq!(str_schema["type"], "string");

        let enum_schema = schema::string_enum("call", &["Buy", "Hold", "Sell"]);
        assert_eq!(enum_schema["enum"][2], "Sell");

        let range_schema = schema::number_range("confidence", 0.0, 1.0);
        assert_eq!(range_schema["minimum"], 0.0);
        assert_eq!(range_schema["maximum"], 1.0);
    }
}
