use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::errors::ValidationError;

/// A single caller-supplied parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(Number),
    Bool(bool),
    List(Vec<String>),
}

impl ParamValue {
    /// Convert a JSON value, rejecting null, objects and non-string lists
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(ParamValue::Text(text.clone())),
            Value::Number(number) => Some(ParamValue::Number(number.clone())),
            Value::Bool(flag) => Some(ParamValue::Bool(*flag)),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Blank text and empty lists count as "not supplied"
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Text(text) => text.trim().is_empty(),
            ParamValue::List(items) => items.is_empty(),
            ParamValue::Number(_) | ParamValue::Bool(_) => false,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Text(text) => write!(f, "{}", text),
            ParamValue::Number(number) => write!(f, "{}", number),
            ParamValue::Bool(flag) => write!(f, "{}", flag),
            ParamValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::Text(text)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

/// Parameters bound to a template for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Bind a JSON object for a template that reads the `declared` keys
    ///
    /// Null entries count as absent. An unsupported value is an error only
    /// for a declared key; undeclared keys with such values are dropped.
    pub fn from_json(
        fields: &Map<String, Value>,
        declared: &[&str],
    ) -> Result<Self, ValidationError> {
        let mut params = Self::new();
        for (key, value) in fields {
            if value.is_null() {
                continue;
            }
            match ParamValue::from_json(value) {
                Some(value) => params.insert(key.clone(), value),
                None if declared.contains(&key.as_str()) => {
                    return Err(ValidationError::InvalidParamValue(key.clone()));
                }
                None => tracing::debug!("Ignoring unused parameter {}", key),
            }
        }
        Ok(params)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// True when the key exists with a non-blank value
    pub fn is_supplied(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_blank())
    }

    /// Rendered value, or `None` when missing or blank
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|value| !value.is_blank())
            .map(ToString::to_string)
    }

    /// Rendered value with a fallback for missing or blank entries
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of a successful generation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub text: String,
    pub model: String,
    pub prompt_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binds_supported_json_values() {
        let body = json!({
            "goal": "run a marathon",
            "weeks": 12,
            "public": true,
            "tasks": ["buy shoes", "join a club"]
        });
        let declared = ["goal", "weeks", "public", "tasks"];
        let params = ParameterSet::from_json(body.as_object().unwrap(), &declared).unwrap();

        assert_eq!(params.len(), 4);
        assert_eq!(params.text("weeks").unwrap(), "12");
        assert_eq!(params.text("public").unwrap(), "true");
        assert_eq!(params.text("tasks").unwrap(), "buy shoes, join a club");
    }

    #[test]
    fn rejects_nested_object_for_declared_key() {
        let nested = json!({"goal": {"title": "x"}});

        assert_eq!(
            ParameterSet::from_json(nested.as_object().unwrap(), &["goal"]),
            Err(ValidationError::InvalidParamValue("goal".to_string()))
        );
    }

    #[test]
    fn null_counts_as_absent() {
        let body = json!({"topic": "x", "length": null});
        let params = ParameterSet::from_json(body.as_object().unwrap(), &["topic", "length"]).unwrap();

        assert!(params.get("length").is_none());
        assert_eq!(params.text_or("length", "中等"), "中等");
    }

    #[test]
    fn undeclared_unsupported_values_are_dropped() {
        let body = json!({"input": "learn guitar", "meta": {"source": "ui"}, "tags": [1, 2]});
        let params = ParameterSet::from_json(body.as_object().unwrap(), &["input"]).unwrap();

        assert_eq!(params.len(), 1);
        assert!(params.get("meta").is_none());
        assert_eq!(params.text("input").unwrap(), "learn guitar");
    }

    #[test]
    fn rejects_lists_with_non_strings() {
        let body = json!({"tasks": ["a", 2]});
        assert!(ParameterSet::from_json(body.as_object().unwrap(), &["tasks"]).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_default() {
        let params = ParameterSet::new()
            .with("length", "  ")
            .with("tasks", Vec::<String>::new());

        assert!(!params.is_supplied("length"));
        assert_eq!(params.text_or("length", "中等"), "中等");
        assert_eq!(params.text_or("tasks", "none"), "none");
        assert_eq!(params.text_or("missing", "fallback"), "fallback");
    }
}
