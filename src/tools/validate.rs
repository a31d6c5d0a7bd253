//! Schema-driven parameter validation.
//!
//! One generic routine checks any raw parameter object against a
//! [`ParameterSchema`]. Checks run in a fixed order and stop at the first
//! failing class: unexpected fields, missing required fields, then per-field
//! type and enum checks.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::error::ToolError;
use super::schema::{ParamType, ParameterSchema, OPERATION_FIELD, README_OPERATION};

/// Parameters that passed validation, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams(BTreeMap<String, Value>);

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn operation(&self) -> Option<&str> {
        self.get_str(OPERATION_FIELD)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate `raw` against `schema`.
///
/// `operation` is the caller's requested operation; for `readme` only the
/// operation field itself is required.
pub fn validate(
    raw: &Map<String, Value>,
    schema: &ParameterSchema,
    operation: Option<&str>,
) -> Result<ValidatedParams, ToolError> {
    let required: Vec<String> = if operation == Some(README_OPERATION) {
        vec![OPERATION_FIELD.to_string()]
    } else {
        schema.required.clone()
    };

    let expected: BTreeSet<&str> = schema.properties.iter().map(|p| p.name.as_str()).collect();
    let unexpected: Vec<String> = raw
        .keys()
        .filter(|k| !expected.contains(k.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !unexpected.is_empty() {
        return Err(ToolError::UnexpectedField {
            unexpected,
            expected: expected.into_iter().map(str::to_string).collect(),
        });
    }

    let required_sorted: BTreeSet<String> = required.into_iter().collect();
    let missing: Vec<String> = required_sorted
        .iter()
        .filter(|name| !raw.contains_key(name.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ToolError::MissingRequiredField {
            missing,
            required: required_sorted.into_iter().collect(),
        });
    }

    let mut validated = BTreeMap::new();
    for spec in &schema.properties {
        match raw.get(&spec.name) {
            Some(value) => {
                if !spec.param_type.matches(value) {
                    return Err(ToolError::TypeMismatch {
                        field: spec.name.clone(),
                        expected: spec.param_type.to_string(),
                        actual: ParamType::observed(value).to_string(),
                    });
                }
                if let Some(allowed) = &spec.enum_values {
                    if !allowed.contains(value) {
                        return Err(ToolError::EnumViolation {
                            field: spec.name.clone(),
                            allowed: Value::Array(allowed.clone()).to_string(),
                            got: display_value(value),
                        });
                    }
                }
                validated.insert(spec.name.clone(), value.clone());
            }
            None => {
                if let Some(default) = &spec.default {
                    validated.insert(spec.name.clone(), default.clone());
                }
            }
        }
    }

    Ok(ValidatedParams(validated))
}

/// Strings are shown bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
