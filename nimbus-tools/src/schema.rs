//! Fluent JSON-schema construction for tool parameters.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::definition::ObjectJsonSchema;

/// Schema builder for tool parameter schemas.
///
/// # Example
///
/// ```
/// use nimbus_tools::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .string("location_description", "A description of a location.", true)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: IndexMap<String, JsonValue>,
    required: Vec<String>,
    description: Option<String>,
}

impl SchemaBuilder {
    /// Create a new empty schema builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string property.
    #[must_use]
    pub fn string(mut self, name: &str, desc: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "string",
                "description": desc
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a number (float) property.
    #[must_use]
    pub fn number(mut self, name: &str, desc: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "number",
                "description": desc
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a number property with range constraints.
    #[must_use]
    pub fn number_constrained(
        mut self,
        name: &str,
        desc: &str,
        required: bool,
        minimum: Option<f64>,
        maximum: Option<f64>,
    ) -> Self {
        let mut prop = serde_json::json!({
            "type": "number",
            "description": desc
        });
        if let Some(min) = minimum {
            prop["minimum"] = JsonValue::from(min);
        }
        if let Some(max) = maximum {
            prop["maximum"] = JsonValue::from(max);
        }
        self.properties.insert(name.to_string(), prop);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add an integer property.
    #[must_use]
    pub fn integer(mut self, name: &str, desc: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "integer",
                "description": desc
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a boolean property.
    #[must_use]
    pub fn boolean(mut self, name: &str, desc: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "boolean",
                "description": desc
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> ObjectJsonSchema {
        ObjectJsonSchema {
            schema_type: "object".to_string(),
            properties: self.properties,
            required: self.required,
            description: self.description,
            additional_properties: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder() {
        let schema = SchemaBuilder::new()
            .string("q", "Free-text query", true)
            .integer("limit", "Max results", false)
            .description("Search parameters")
            .build();

        assert_eq!(schema.schema_type, "object");
        assert_eq!(schema.properties.len(), 2);
        assert!(schema.is_required("q"));
        assert!(!schema.is_required("limit"));
        assert_eq!(schema.description.as_deref(), Some("Search parameters"));
    }

    #[test]
    fn test_number_constrained() {
        let schema = SchemaBuilder::new()
            .number_constrained("lat", "Latitude", true, Some(-90.0), Some(90.0))
            .build();

        let lat = schema.properties.get("lat").unwrap();
        assert_eq!(lat["minimum"], -90.0);
        assert_eq!(lat["maximum"], 90.0);
    }

    #[test]
    fn test_property_order_is_stable() {
        let schema = SchemaBuilder::new()
            .number("lat", "Latitude", true)
            .number("lng", "Longitude", true)
            .build();

        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["lat", "lng"]);
    }
}
