//! Strongly-typed tool input schemas.
//!
//! A `ToolSchema` is declared once per tool, checked for internal
//! consistency when the registry is built, rendered to JSON Schema for
//! `tools/list`, and used to validate incoming arguments before a handler
//! sees them.

use jsonschema::{ValidationError, Validator};
use rmcp::model::JsonObject;
use serde_json::{Value, json};

/// JSON type of a declared property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
    Array(Box<PropertySpec>),
    Object(ToolSchema),
}

impl PropertyKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// One property: its type, description, closed set of values and default.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub kind: PropertyKind,
    pub description: Option<&'static str>,
    pub enum_values: Option<&'static [&'static str]>,
    pub default: Option<Value>,
}

impl PropertySpec {
    pub fn of(kind: PropertyKind) -> Self {
        Self {
            kind,
            description: None,
            enum_values: None,
            default: None,
        }
    }

    pub fn string(description: &'static str) -> Self {
        Self::of(PropertyKind::String).describe(description)
    }

    pub fn integer(description: &'static str) -> Self {
        Self::of(PropertyKind::Integer).describe(description)
    }

    pub fn boolean(description: &'static str) -> Self {
        Self::of(PropertyKind::Boolean).describe(description)
    }

    pub fn array(items: PropertySpec, description: &'static str) -> Self {
        Self::of(PropertyKind::Array(Box::new(items))).describe(description)
    }

    pub fn object(schema: ToolSchema) -> Self {
        Self::of(PropertyKind::Object(schema))
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Restrict a string property to a closed set of values.
    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn to_json(&self) -> Value {
        let mut out = JsonObject::new();
        out.insert("type".to_string(), json!(self.kind.type_name()));

        match &self.kind {
            PropertyKind::Array(items) => {
                out.insert("items".to_string(), items.to_json());
            }
            PropertyKind::Object(schema) => {
                out.extend(schema.to_json());
            }
            _ => {}
        }

        if let Some(values) = self.enum_values {
            out.insert("enum".to_string(), json!(values));
        }
        if let Some(description) = self.description {
            out.insert("description".to_string(), json!(description));
        }
        if let Some(default) = &self.default {
            out.insert("default".to_string(), default.clone());
        }

        Value::Object(out)
    }

    fn check(&self, path: &str) -> Result<(), String> {
        if self.enum_values.is_some() && self.kind != PropertyKind::String {
            return Err(format!("`{}` declares an enum on a non-string property", path));
        }
        if let Some(default) = &self.default {
            let validator = jsonschema::validator_for(&self.to_json())
                .map_err(|e| format!("`{}` does not compile: {}", path, e))?;
            if let Some(error) = validator.iter_errors(default).next() {
                return Err(format!("default of `{}` is invalid: {}", path, describe(&error)));
            }
        }
        match &self.kind {
            PropertyKind::Array(items) => items.check(&format!("{}[]", path)),
            PropertyKind::Object(schema) => schema.check_at(path),
            _ => Ok(()),
        }
    }
}

/// Object schema: ordered properties plus the required subset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolSchema {
    properties: Vec<(&'static str, PropertySpec)>,
    required: Vec<&'static str>,
}

impl ToolSchema {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &'static str, spec: PropertySpec) -> Self {
        self.properties.push((name, spec));
        self
    }

    pub fn required<I: IntoIterator<Item = &'static str>>(mut self, names: I) -> Self {
        self.required.extend(names);
        self
    }

    fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, spec)| spec)
    }

    /// Render as a JSON Schema object.
    pub fn to_json(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        for (name, spec) in &self.properties {
            properties.insert(name.to_string(), spec.to_json());
        }

        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(self.required));
        schema
    }

    /// Check the declaration itself: unique property names, `required`
    /// naming only declared properties, defaults matching their type and
    /// enumeration.
    pub fn check(&self) -> Result<(), String> {
        self.check_at("")
    }

    fn check_at(&self, prefix: &str) -> Result<(), String> {
        for (i, (name, spec)) in self.properties.iter().enumerate() {
            let path = join_path(prefix, name);
            if self.properties[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(format!("property `{}` is declared twice", path));
            }
            spec.check(&path)?;
        }

        for (i, name) in self.required.iter().enumerate() {
            if self.get(name).is_none() {
                return Err(format!(
                    "required property `{}` is not declared",
                    join_path(prefix, name)
                ));
            }
            if self.required[..i].contains(name) {
                return Err(format!("`{}` is listed as required twice", join_path(prefix, name)));
            }
        }

        Ok(())
    }

    /// Compile the rendered JSON Schema into a reusable validator.
    pub fn compile(&self) -> Result<CompiledSchema, String> {
        let validator = jsonschema::validator_for(&Value::Object(self.to_json()))
            .map_err(|e| format!("schema does not compile: {}", e))?;
        Ok(CompiledSchema { validator })
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// One violation as `<instance path>: <message>`, or just the message at the root.
fn describe(error: &ValidationError<'_>) -> String {
    let path = error.instance_path.to_string();
    if path.is_empty() {
        error.to_string()
    } else {
        format!("{}: {}", path, error)
    }
}

/// A `ToolSchema` compiled once at registration.
pub struct CompiledSchema {
    validator: Validator,
}

impl CompiledSchema {
    /// Validate call arguments, reporting the first violation.
    ///
    /// Top-level `null` values count as absent. Undeclared properties are
    /// ignored.
    pub fn validate(&self, args: &JsonObject) -> Result<(), String> {
        let instance = Value::Object(
            args.iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        );

        match self.validator.iter_errors(&instance).next() {
            Some(error) => Err(describe(&error)),
            None => Ok(()),
        }
    }
}
