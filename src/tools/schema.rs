//! Declarative parameter schemas for gated tools.
//!
//! A tool carries two schemas: the minimal public one a host shows to the
//! agent up front (a single opaque `input` object) and the real one, revealed
//! only through the `readme` operation and used for validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use super::traits::ToolDefinition;

/// Name of the operation that serves documentation and bypasses the gate.
pub const README_OPERATION: &str = "readme";

/// Property holding the operation selector in every real schema.
pub const OPERATION_FIELD: &str = "operation";

/// Property holding the caller's unlock token.
pub const TOKEN_FIELD: &str = "tool_unlock_token";

/// Wrapper property of the minimal public schema.
pub const INPUT_FIELD: &str = "input";

// ---------------------------------------------------------------------------
// Property descriptors
// ---------------------------------------------------------------------------

/// JSON type tag of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Object,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    /// Whether `value` has this type. `Integer` only accepts JSON integers.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Object => value.is_object(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
        }
    }

    /// Observed JSON type name of an arbitrary value.
    pub fn observed(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "number",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// One declared property of a parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            enum_values: None,
            default: None,
        }
    }

    /// Restrict the property to a fixed set of string values.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(|v| Value::String(v.into())).collect());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String(self.param_type.to_string()));
        obj.insert("description".into(), Value::String(self.description.clone()));
        if let Some(values) = &self.enum_values {
            obj.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(default) = &self.default {
            obj.insert("default".into(), default.clone());
        }
        Value::Object(obj)
    }
}

// ---------------------------------------------------------------------------
// Parameter schema
// ---------------------------------------------------------------------------

/// Ordered property list plus required names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    pub properties: Vec<PropertySpec>,
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, spec: PropertySpec) -> Self {
        self.properties.push(spec);
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Declared enum values of the `operation` property, as strings.
    pub fn operations(&self) -> Vec<String> {
        self.get(OPERATION_FIELD)
            .and_then(|p| p.enum_values.as_ref())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// JSON-Schema-like rendering used on the wire and in documentation.
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.to_json()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

// ---------------------------------------------------------------------------
// Tool schema
// ---------------------------------------------------------------------------

/// Everything a host and a caller can learn about one tool.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    /// Short description that stays in the agent's context at all times.
    pub description: String,
    pub public_parameters: ParameterSchema,
    pub real_parameters: ParameterSchema,
    /// Full documentation, served by `readme` and attached to errors.
    pub readme: String,
}

impl ToolSchema {
    /// Build a schema whose public surface is the minimal `input` wrapper.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        real_parameters: ParameterSchema,
        readme: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            public_parameters: minimal_public_schema(),
            real_parameters,
            readme: readme.into(),
        }
    }

    /// Public definition listed by the host before any documentation call.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.public_parameters.to_json(),
        }
    }
}

/// Single optional object-typed `input` property, nothing required.
pub fn minimal_public_schema() -> ParameterSchema {
    ParameterSchema::new().property(PropertySpec::new(
        INPUT_FIELD,
        ParamType::Object,
        "All tool parameters are passed in this single dict. Use {\"input\":{\"operation\":\"readme\"}} \
         to get full documentation, parameters, and an unlock token.",
    ))
}
