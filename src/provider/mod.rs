//! Boundary to the cloud-provider read functions.
//!
//! Providers hand the core an already-populated generic representation per
//! resource; the core never talks to an SDK directly.

pub mod file;

pub use file::FileProvider;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::export::error::{ExportError, ExportResult};
use crate::schema::ResourceSchema;

/// One resource as discovered by a provider scan
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredResource {
    #[serde(default)]
    pub resource_type: String,
    pub name: String,
    /// Provider-side identifier; empty means the resource could not be read
    #[serde(default)]
    pub id: String,
    /// Raw attribute tree, read through an accessor during normalization
    #[serde(default)]
    pub attributes: Value,
    /// Opaque remote-state blob for the state snapshot
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Read access to one provider's supported types, schemas and resources
pub trait ResourceProvider {
    fn supported_types(&self) -> Vec<String>;

    fn schema(&self, resource_type: &str) -> ExportResult<&ResourceSchema>;

    fn fetch(&self, resource_type: &str) -> ExportResult<Vec<DiscoveredResource>>;
}

/// Tag filter parsed from `key=value` CLI syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn parse(raw: &str) -> ExportResult<Self> {
        let Some((key, value)) = raw.split_once('=') else {
            return Err(ExportError::InvalidInput(format!(
                "Tag filter '{}' must use key=value syntax",
                raw
            )));
        };

        if key.is_empty() {
            return Err(ExportError::InvalidInput(format!(
                "Tag filter '{}' has an empty key",
                raw
            )));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        tags.get(&self.key).is_some_and(|value| value == &self.value)
    }
}
