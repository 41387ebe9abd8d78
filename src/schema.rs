//! Attribute schemas for resources and data sources.
//!
//! A schema describes the document a resource exchanges with its host:
//! attribute names, value types, whether the operator or the provider owns
//! each value, and plan-time behaviour such as defaults and replacement.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ResourceError, Result};

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit float.
    Float64,
    /// List (or set) of strings.
    StringList,
    /// String-to-string map.
    StringMap,
}

impl AttributeType {
    /// Short name used in CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::StringList => "list(string)",
            Self::StringMap => "map(string)",
        }
    }

    /// Returns true if `value` has this type. `null` matches every type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null)
            | (Self::String, Value::String(_))
            | (Self::Bool, Value::Bool(_)) => true,
            (Self::Int64, Value::Number(n)) => n.is_i64(),
            (Self::Float64, Value::Number(_)) => true,
            (Self::StringList, Value::Array(items)) => items.iter().all(Value::is_string),
            (Self::StringMap, Value::Object(entries)) => entries.values().all(Value::is_string),
            _ => false,
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set in configuration.
    Required,
    /// May be set in configuration.
    Optional,
    /// Set by the provider only.
    Computed,
    /// May be set; the provider fills it otherwise.
    OptionalComputed,
}

impl AttributeMode {
    /// Short name used in CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Computed => "computed",
            Self::OptionalComputed => "optional+computed",
        }
    }
}

/// One attribute of a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name (snake_case).
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Ownership mode.
    pub mode: AttributeMode,
    /// Value must be hidden from output.
    pub sensitive: bool,
    /// A change forces the object to be replaced.
    pub requires_replace: bool,
    /// Static default applied at plan time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description.
    pub description: &'static str,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, mode: AttributeMode) -> Self {
        Self {
            name,
            kind,
            mode,
            sensitive: false,
            requires_replace: false,
            default: None,
            description: "",
        }
    }

    /// A required attribute.
    #[must_use]
    pub fn required(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Required)
    }

    /// An optional attribute.
    #[must_use]
    pub fn optional(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Optional)
    }

    /// A provider-computed attribute.
    #[must_use]
    pub fn computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Computed)
    }

    /// An optional attribute the provider fills when unset.
    #[must_use]
    pub fn optional_computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::OptionalComputed)
    }

    /// Marks the attribute as sensitive.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Marks the attribute as forcing replacement.
    #[must_use]
    pub const fn replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Sets a static default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Returns true if the attribute must be present in configuration.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.mode, AttributeMode::Required)
    }
}

/// Attribute schema of a resource or data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// Human-readable description.
    pub description: &'static str,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fills unset attributes that carry a static default.
    pub fn apply_defaults(&self, document: &mut Map<String, Value>) {
        for attribute in &self.attributes {
            let Some(default) = &attribute.default else {
                continue;
            };
            let unset = document.get(attribute.name).is_none_or(Value::is_null);
            if unset {
                document.insert(attribute.name.to_string(), default.clone());
            }
        }
    }

    /// Checks required attributes are present and every known attribute has
    /// the declared type.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or mistyped attribute.
    pub fn check(&self, type_name: &'static str, document: &Map<String, Value>) -> Result<()> {
        for attribute in &self.attributes {
            match document.get(attribute.name) {
                None | Some(Value::Null) if attribute.is_required() => {
                    return Err(ResourceError::MissingAttribute {
                        resource: type_name,
                        attribute: attribute.name,
                    }
                    .into());
                }
                Some(value) if !attribute.kind.accepts(value) => {
                    return Err(ResourceError::invalid(
                        attribute.name,
                        format!("expected {}", attribute.kind.as_str()),
                    )
                    .into());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::optional("enabled", AttributeType::Bool).default_value(true))
            .attribute(Attribute::optional("ports", AttributeType::StringMap))
    }

    #[test]
    fn test_defaults_fill_null_and_missing() {
        let mut doc = json!({"name": "a", "enabled": null});
        let map = doc.as_object_mut().expect("object");
        schema().apply_defaults(map);
        assert_eq!(map["enabled"], json!(true));

        let mut doc = json!({"name": "a", "enabled": false});
        let map = doc.as_object_mut().expect("object");
        schema().apply_defaults(map);
        assert_eq!(map["enabled"], json!(false));
    }

    #[test]
    fn test_check_missing_required() {
        let doc = json!({"enabled": true});
        let err = schema()
            .check("arcane_test", doc.as_object().expect("object"))
            .expect_err("name missing");
        assert_eq!(
            err.to_string(),
            "missing required attribute 'name' for arcane_test"
        );
    }

    #[test]
    fn test_check_type_mismatch() {
        let doc = json!({"name": "a", "ports": {"80": 80}});
        let err = schema()
            .check("arcane_test", doc.as_object().expect("object"))
            .expect_err("port value is not a string");
        assert!(err.to_string().contains("'ports'"));
    }

    #[test]
    fn test_int_and_float_acceptance() {
        assert!(AttributeType::Int64.accepts(&json!(3)));
        assert!(!AttributeType::Int64.accepts(&json!(1.5)));
        assert!(AttributeType::Float64.accepts(&json!(3)));
        assert!(AttributeType::StringList.accepts(&json!(["a", "b"])));
        assert!(!AttributeType::StringList.accepts(&json!(["a", 1])));
    }
}
