//! Tool definition types for describing tools to the model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// JSON Schema for an object type (tool parameters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectJsonSchema {
    /// The schema type (always "object" for tool parameters).
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions, in declaration order.
    pub properties: IndexMap<String, JsonValue>,

    /// Required property names.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether additional properties are allowed.
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

impl ObjectJsonSchema {
    /// Create a new empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
            description: None,
            additional_properties: None,
        }
    }

    /// Add a property to the schema.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Check if a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Default for ObjectJsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectJsonSchema> for JsonValue {
    fn from(schema: ObjectJsonSchema) -> Self {
        serde_json::to_value(schema).unwrap_or(JsonValue::Null)
    }
}

/// Complete tool definition sent to the model.
///
/// This is one row of the agent's capability table: everything the model
/// needs to understand and call a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name (must be a valid identifier).
    pub name: String,

    /// Human-readable description of what the tool does.
    pub description: String,

    /// JSON Schema for the tool's parameters.
    pub parameters_json_schema: JsonValue,
}

impl ToolDefinition {
    /// Create a new tool definition with an empty parameter schema.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_json_schema: JsonValue::from(ObjectJsonSchema::new()),
        }
    }

    /// Set the parameters schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: impl Into<JsonValue>) -> Self {
        self.parameters_json_schema = schema.into();
        self
    }

    /// Convert to the OpenAI function-calling format.
    #[must_use]
    pub fn to_openai_function(&self) -> JsonValue {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_json_schema.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_schema_properties() {
        let schema = ObjectJsonSchema::new()
            .with_property("location_description", serde_json::json!({"type": "string"}), true)
            .with_property("verbose", serde_json::json!({"type": "boolean"}), false);

        assert_eq!(schema.properties.len(), 2);
        assert!(schema.is_required("location_description"));
        assert!(!schema.is_required("verbose"));
    }

    #[test]
    fn test_tool_definition_new() {
        let def = ToolDefinition::new("get_lat_lng", "Get the latitude and longitude of a location.");
        assert_eq!(def.name, "get_lat_lng");
        let properties = def
            .parameters_json_schema
            .get("properties")
            .and_then(|v| v.as_object())
            .unwrap();
        assert!(properties.is_empty());
    }

    #[test]
    fn test_to_openai_function() {
        let def = ToolDefinition::new("get_weather", "Get the weather at a location.")
            .with_parameters(
                ObjectJsonSchema::new()
                    .with_property("lat", serde_json::json!({"type": "number"}), true)
                    .with_property("lng", serde_json::json!({"type": "number"}), true),
            );

        let func = def.to_openai_function();
        assert_eq!(func["type"], "function");
        assert_eq!(func["function"]["name"], "get_weather");
        assert_eq!(
            func["function"]["parameters"]["required"],
            serde_json::json!(["lat", "lng"])
        );
    }

    #[test]
    fn test_schema_serde_roundtrip() {
        let schema = ObjectJsonSchema::new()
            .with_property("q", serde_json::json!({"type": "string"}), true);
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: ObjectJsonSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}
