//! Declarative response-schema layer.
//!
//! Every response model declares a [`Schema`]: an unknown-field policy plus
//! an ordered field table of (snake_case name, wire alias, required flag,
//! value shape). Aliases default to the camelCase rendering of the field
//! name, computed once when the table is built; explicit `wire` overrides
//! cover the places where the vendor deviates from its own convention.
//!
//! [`Schema::normalize`] turns a raw wire object into a canonical record
//! keyed purely by snake_case names, applying the per-field shape
//! coercions; [`Schema::parse`] then hands the canonical record to serde.
//! Typed structs therefore carry no rename attributes: naming is the
//! table's job, typing is serde's.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::utils::{snake_case_to_camel_case, to_snake_case};

/// Unknown-field policy of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFields {
    /// Undeclared keys are a validation error.
    Deny,
    /// Undeclared keys are retained verbatim in the canonical record.
    Allow,
}

/// Value handling applied to a declared field during normalization.
///
/// `null` always passes through untouched; whether a field tolerates it is
/// a property of its Rust type (`Option<T>`), not of the wire shape.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Passed through; typing is left to deserialization.
    Any,
    /// A string, or a number coerced to its string rendering.
    Stringy,
    /// A boolean, or the integers 0/1 coerced to false/true.
    LenientBool,
    /// A string containing embedded JSON, parsed in place.
    JsonText,
    /// A statistics channel: the literal `false`, or a sequence of
    /// `[timestamp, value]` pairs rewritten to objects before validation.
    StatsChannel,
    /// A nested object validated against another schema.
    Model(&'static Schema),
    /// A sequence of nested objects validated against another schema.
    ModelList(&'static Schema),
    /// A sequence of nested objects validated against the *enclosing*
    /// schema. Recursive tables cannot name their own lazy static without
    /// deadlocking its initialization, so the recursion is resolved here.
    SelfList,
}

/// One declared field of a schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    alias: String,
    required: bool,
    shape: Shape,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wire key this field is populated from (the snake_case name
    /// itself is accepted as well, at lower priority).
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

/// A declarative response model definition.
#[derive(Debug, Clone)]
pub struct Schema {
    model: &'static str,
    unknown: UnknownFields,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start a table that rejects undeclared keys.
    pub fn strict(model: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            model,
            unknown: UnknownFields::Deny,
            fields: Vec::new(),
        }
    }

    /// Start a table that retains undeclared keys verbatim.
    pub fn permissive(model: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            model,
            unknown: UnknownFields::Allow,
            fields: Vec::new(),
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn unknown_fields(&self) -> UnknownFields {
        self.unknown
    }

    /// The declared field table, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate a raw wire object into a canonical record keyed by
    /// snake_case field names.
    pub fn normalize(&self, raw: Value) -> Result<Map<String, Value>, Error> {
        self.normalize_at(self.model, raw)
    }

    /// Normalize, then deserialize the canonical record into the typed
    /// model. serde-level failures are wrapped as validation errors under
    /// the model name.
    pub fn parse<T: DeserializeOwned>(&self, raw: Value) -> Result<T, Error> {
        self.parse_at(self.model, raw)
    }

    /// Like [`Schema::parse`], but for a fragment of a larger document:
    /// error paths are rooted at `path` instead of the model name.
    pub fn parse_at<T: DeserializeOwned>(&self, path: &str, raw: Value) -> Result<T, Error> {
        let canonical = self.normalize_at(path, raw)?;
        serde_json::from_value(Value::Object(canonical)).map_err(|e| Error::Validation {
            path: path.to_string(),
            detail: e.to_string(),
        })
    }

    fn normalize_at(&self, path: &str, raw: Value) -> Result<Map<String, Value>, Error> {
        let mut raw = match raw {
            Value::Object(map) => map,
            other => return Err(Error::validation(path, "expected an object", &other)),
        };

        let mut canonical = Map::new();
        for field in &self.fields {
            // Alias wins when both spellings are present; both are consumed
            // either way, so a duplicate spelling never trips the strict
            // unknown-key check.
            let by_alias = raw.remove(field.alias.as_str());
            let by_name = if field.alias != field.name {
                raw.remove(field.name)
            } else {
                None
            };
            match by_alias.or(by_name) {
                Some(value) => {
                    let field_path = format!("{}.{}", path, field.name);
                    let value = self.apply_shape(&field_path, field.shape, value)?;
                    canonical.insert(field.name.to_string(), value);
                }
                None if field.required => {
                    return Err(Error::Validation {
                        path: format!("{}.{}", path, field.name),
                        detail: format!("missing required field (wire alias `{}`)", field.alias),
                    });
                }
                None => {}
            }
        }

        match self.unknown {
            UnknownFields::Allow => canonical.extend(raw),
            UnknownFields::Deny => {
                if let Some((key, value)) = raw.into_iter().next() {
                    return Err(Error::validation(
                        &format!("{}.{}", path, key),
                        "undeclared field",
                        &value,
                    ));
                }
            }
        }
        Ok(canonical)
    }

    fn apply_shape(&self, path: &str, shape: Shape, value: Value) -> Result<Value, Error> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match shape {
            Shape::Any => Ok(value),
            Shape::Stringy => stringy(path, value),
            Shape::LenientBool => lenient_bool(path, value),
            Shape::JsonText => json_text(path, value),
            Shape::StatsChannel => stats_channel(path, value),
            Shape::Model(schema) => schema.normalize_at(path, value).map(Value::Object),
            Shape::ModelList(schema) => normalize_list(path, schema, value),
            Shape::SelfList => normalize_list(path, self, value),
        }
    }
}

/// Fluent construction of a [`Schema`]; `wire` and `shape` modify the most
/// recently declared field. Field names must already be canonical
/// snake_case, checked once when the table is built.
#[derive(Debug)]
pub struct SchemaBuilder {
    model: &'static str,
    unknown: UnknownFields,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declare a required field with the generated camelCase alias.
    pub fn field(self, name: &'static str) -> Self {
        self.push(name, true)
    }

    /// Declare an optional field with the generated camelCase alias.
    pub fn optional(self, name: &'static str) -> Self {
        self.push(name, false)
    }

    /// Override the wire alias of the last declared field.
    pub fn wire(mut self, alias: &str) -> Self {
        let field = self
            .fields
            .last_mut()
            .expect("wire() must follow a field declaration");
        field.alias = alias.to_string();
        self
    }

    /// Set the value shape of the last declared field.
    pub fn shape(mut self, shape: Shape) -> Self {
        let field = self
            .fields
            .last_mut()
            .expect("shape() must follow a field declaration");
        field.shape = shape;
        self
    }

    pub fn finish(self) -> Schema {
        Schema {
            model: self.model,
            unknown: self.unknown,
            fields: self.fields,
        }
    }

    fn push(mut self, name: &'static str, required: bool) -> Self {
        assert_eq!(
            to_snake_case(name),
            name,
            "schema field `{}` of `{}` is not snake_case",
            name,
            self.model
        );
        self.fields.push(FieldSpec {
            name,
            alias: snake_case_to_camel_case(name),
            required,
            shape: Shape::Any,
        });
        self
    }
}

fn stringy(path: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        other => Err(Error::validation(path, "expected a string or number", &other)),
    }
}

fn lenient_bool(path: &str, value: Value) -> Result<Value, Error> {
    match &value {
        Value::Bool(_) => Ok(value),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
        _ => Err(Error::validation(path, "expected a boolean or 0/1", &value)),
    }
}

fn json_text(path: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::String(text) => serde_json::from_str(&text).map_err(|e| Error::Validation {
            path: path.to_string(),
            detail: format!("embedded JSON did not parse: {}", e),
        }),
        other => Err(Error::validation(path, "expected a JSON-encoded string", &other)),
    }
}

fn stats_channel(path: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::Bool(false) => Ok(Value::Bool(false)),
        Value::Array(items) => {
            let mut points = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                points.push(stats_point(&format!("{}[{}]", path, index), item)?);
            }
            Ok(Value::Array(points))
        }
        other => Err(Error::validation(
            path,
            "expected a list of [timestamp, value] pairs or the literal false",
            &other,
        )),
    }
}

fn stats_point(path: &str, item: Value) -> Result<Value, Error> {
    match item {
        Value::Array(pair) => {
            if pair.len() != 2 {
                return Err(Error::Validation {
                    path: path.to_string(),
                    detail: format!(
                        "expected a [timestamp, value] pair, got {} elements",
                        pair.len()
                    ),
                });
            }
            let mut pair = pair.into_iter();
            let timestamp = pair.next().unwrap_or(Value::Null);
            let value = pair.next().unwrap_or(Value::Null);
            if !timestamp.is_number() {
                return Err(Error::validation(path, "pair timestamp must be a number", &timestamp));
            }
            if !(value.is_number() || value.is_null()) {
                return Err(Error::validation(path, "pair value must be a number or null", &value));
            }
            let mut point = Map::new();
            point.insert("timestamp".to_string(), timestamp);
            point.insert("value".to_string(), value);
            Ok(Value::Object(point))
        }
        Value::Object(_) => Ok(item),
        other => Err(Error::validation(path, "expected a [timestamp, value] pair", &other)),
    }
}

fn normalize_list(path: &str, schema: &Schema, value: Value) -> Result<Value, Error> {
    match value {
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let record = schema.normalize_at(&format!("{}[{}]", path, index), item)?;
                records.push(Value::Object(record));
            }
            Ok(Value::Array(records))
        }
        other => Err(Error::validation(path, "expected a list of objects", &other)),
    }
}
