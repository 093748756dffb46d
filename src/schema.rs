//! Schema declarations and the records built from them.
//!
//! A `SchemaDef` is the registration-time stand-in for a struct definition: an
//! ordered list of named fields, each with a declared annotation and an
//! optional default. `SchemaDef::construct` plays the constructor: it rejects
//! unknown fields, fills defaults, and rejects missing required fields.
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::annotation::{is_builtin_head, is_identifier};
use crate::error::{ArgumentError, ConstructError, SchemaError};
use crate::ir::{Descriptor, TypeExpr};
use crate::value::{Map, Value};

// ————————————————————————————————————————————————————————————————————————————
// DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    name: String,
    fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub annotation: TypeExpr,
    /// `None` means required; `Some(Value::None)` is an explicit null default.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

// A present key is always `Some`, even when its value is null.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, annotation: TypeExpr) -> Self {
        self.fields.push(FieldDef { name: name.into(), annotation, default: None });
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        annotation: TypeExpr,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            annotation,
            default: Some(default.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if !is_identifier(&self.name) {
            return Err(SchemaError::InvalidName(self.name.clone()));
        }
        if is_builtin_head(&self.name) {
            return Err(SchemaError::ReservedName(self.name.clone()));
        }
        for (i, f) in self.fields.iter().enumerate() {
            if !is_identifier(&f.name) {
                return Err(SchemaError::InvalidFieldName {
                    schema: self.name.clone(),
                    field: f.name.clone(),
                });
            }
            if self.fields[..i].iter().any(|g| g.name == f.name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: f.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build a record from named arguments. Values are taken as-is; no casting.
    pub fn construct(&self, mut kwargs: Map) -> Result<Record, ConstructError> {
        if let Some(unknown) = kwargs.keys().find(|k| self.get_field(k).is_none()) {
            return Err(ConstructError::UnexpectedField {
                schema: self.name.clone(),
                field: unknown.clone(),
            });
        }
        let mut fields = Map::with_capacity(self.fields.len());
        for f in &self.fields {
            let value = match kwargs.swap_remove(&f.name) {
                Some(v) => v,
                None => match &f.default {
                    Some(d) => d.clone(),
                    None => {
                        return Err(ConstructError::MissingField {
                            schema: self.name.clone(),
                            field: f.name.clone(),
                        })
                    }
                },
            };
            fields.insert(f.name.clone(), value);
        }
        Ok(Record { schema: self.name.clone(), fields })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RECORDS
// ————————————————————————————————————————————————————————————————————————————

/// An instance of a schema. Fields are in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: String,
    fields: Map,
}

impl Record {
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub fn fields(&self) -> &Map {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn into_fields(self) -> Map {
        self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Every schema a cast may target or nest, by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaDef>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of schema definitions.
    pub fn from_json_str(src: &str) -> Result<Self, SchemaError> {
        let defs: Vec<SchemaDef> = crate::path_de::from_str_with_path(src)
            .map_err(|e| SchemaError::Load { path: e.path, message: e.message })?;
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, def: SchemaDef) -> Result<(), SchemaError> {
        def.validate()?;
        if self.schemas.contains_key(&def.name) {
            return Err(SchemaError::AlreadyRegistered(def.name));
        }
        tracing::trace!(schema = %def.name, fields = def.fields.len(), "registered schema");
        self.schemas.insert(def.name.clone(), def);
        Ok(())
    }

    /// Builder form of `register`.
    pub fn with(mut self, def: SchemaDef) -> Result<Self, SchemaError> {
        self.register(def)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDef> {
        self.schemas.get(name)
    }

    /// Whether `name` is a declared schema (as opposed to an opaque type).
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &SchemaDef> {
        self.schemas.values()
    }

    pub fn resolve_schema_types(
        &self,
        name: &str,
    ) -> Result<IndexMap<String, Descriptor>, ArgumentError> {
        let schema = self
            .get(name)
            .ok_or_else(|| ArgumentError::UnknownSchema { name: name.to_string() })?;
        Ok(crate::resolve::resolve_schema_types(schema))
    }
}

// ------------------------------- Tests ------------------------------------ //
