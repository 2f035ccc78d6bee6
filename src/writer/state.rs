//! State snapshot accumulator: one opaque remote-state blob per resource,
//! serialized as a single versioned document.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::export::error::{ExportError, ExportResult};

/// State format version emitted in the document header
pub const STATE_VERSION: u64 = 1;

#[derive(Debug, Serialize)]
struct StateDocument {
    version: u64,
    serial: u64,
    lineage: String,
    modules: Vec<StateModule>,
}

#[derive(Debug, Serialize)]
struct StateModule {
    path: Vec<String>,
    outputs: Map<String, Value>,
    resources: Map<String, Value>,
}

/// Collects per-resource state blobs keyed by resource address.
///
/// Unlike the configuration accumulator the key is a single opaque string.
/// Does not participate in interpolation.
#[derive(Debug, Default)]
pub struct StateWriter {
    entries: Vec<(String, Value)>,
}

impl StateWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one resource's state blob. Duplicate keys and nil values fail.
    pub fn write(&mut self, key: &str, value: Value) -> ExportResult<()> {
        if value.is_null() {
            return Err(ExportError::RequiredValue(key.to_string()));
        }

        if self.has(key) {
            return Err(ExportError::AlreadyExists(key.to_string()));
        }

        self.entries.push((key.to_string(), value));
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all entries as one versioned state document with a single
    /// root module. `serial` starts at 0 for a fresh run; `lineage` is
    /// unique per run.
    pub fn sync(&self) -> ExportResult<String> {
        let mut resources = Map::new();

        for (key, value) in &self.entries {
            resources.insert(key.clone(), value.clone());
        }

        let document = StateDocument {
            version: STATE_VERSION,
            serial: 0,
            lineage: Uuid::new_v4().to_string(),
            modules: vec![StateModule {
                path: vec!["root".to_string()],
                outputs: Map::new(),
                resources,
            }],
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }
}
