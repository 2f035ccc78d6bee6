//! Schema collaborator types and the attribute accessor boundary.
//!
//! Provider schemas are consumed as opaque declarative descriptions: per field
//! `{required, optional, computed, deprecated, conflicts_with, elem?, multi_valued}`.
//! The core only reads them.

pub mod normalizer;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// How many values a schema field may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// Unordered multi-valued field; occurrence order is accessor-defined
    Set,
    /// Ordered multi-valued field, read via indexed paths
    List,
    /// Single-valued field
    #[default]
    None,
}

/// Declarative description of a single schema field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub deprecated: bool,
    /// Fields that must not be set together with this one
    pub conflicts_with: Vec<String>,
    /// Nested block schema, when this field is a block type
    pub elem: Option<Box<ResourceSchema>>,
    pub multi_valued: Multiplicity,
}

impl FieldSchema {
    /// Purely computed fields never belong in declarative configuration
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Full schema for one resource type: field name to field schema.
/// BTreeMap keeps field iteration order stable across runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSchema {
    pub fields: BTreeMap<String, FieldSchema>,
}

/// Read access to one resource's raw attribute tree.
///
/// Must be deterministic within one synthesis run. `get` reports `None` for
/// fields the provider never set; `occurrences` reads every element of a
/// multi-valued field in accessor-defined order.
pub trait AttributeAccessor {
    fn get(&self, path: &str) -> Option<Value>;
    fn occurrences(&self, path: &str) -> Vec<Value>;
}

/// Accessor backed by the JSON value tree a provider read returns
pub struct ValueAccessor {
    root: Value,
}

impl ValueAccessor {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;

        for part in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

impl AttributeAccessor for ValueAccessor {
    fn get(&self, path: &str) -> Option<Value> {
        match self.lookup(path) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value.clone()),
        }
    }

    fn occurrences(&self, path: &str) -> Vec<Value> {
        match self.lookup(path) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }
}
