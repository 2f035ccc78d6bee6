//! Ordered accumulator for generated configuration, one attribute map per
//! discovered resource.

use std::collections::HashSet;
use std::io;

use serde_json::Value;

use super::ResourceKey;
use crate::export::error::{ExportError, ExportResult};
use crate::hcl;

/// Collects `(type, name) -> attribute map` entries in write order and
/// materializes them as canonical configuration text on `sync`.
///
/// Designed for single-writer sequential use within one synthesis run.
#[derive(Debug, Default)]
pub struct ConfigWriter {
    resources: Vec<(ResourceKey, Value)>,
    seen: HashSet<ResourceKey>,
}

impl ConfigWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one resource's attribute map under a `type.name` key.
    ///
    /// Fails with `InvalidKey` for malformed keys, `RequiredValue` for nil
    /// values and `AlreadyExists` on duplicates. Duplicate handling (one
    /// retry with a regenerated name) belongs to the caller.
    pub fn write(&mut self, key: &str, value: Value) -> ExportResult<()> {
        let key = ResourceKey::parse(key)?;

        if value.is_null() {
            return Err(ExportError::RequiredValue(key.to_string()));
        }

        if self.seen.contains(&key) {
            return Err(ExportError::AlreadyExists(key.to_string()));
        }

        self.seen.insert(key.clone());
        self.resources.push((key, value));
        Ok(())
    }

    /// Report whether a key already holds a value, validating its shape.
    pub fn has(&self, key: &str) -> ExportResult<bool> {
        let key = ResourceKey::parse(key)?;
        Ok(self.seen.contains(&key))
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Read-only view of the accumulated entries, in write order
    pub fn resources(&self) -> &[(ResourceKey, Value)] {
        &self.resources
    }

    /// Mutable view for the interpolation pass
    pub fn resources_mut(&mut self) -> &mut [(ResourceKey, Value)] {
        &mut self.resources
    }

    /// Materialize the whole accumulator as canonical configuration text
    pub fn render(&self) -> String {
        let raw = hcl::print_document(&self.resources);
        hcl::canonicalize(&raw)
    }

    /// Serialize the accumulator to the given sink
    #[allow(dead_code)]
    pub fn sync(&self, out: &mut dyn io::Write) -> ExportResult<()> {
        out.write_all(self.render().as_bytes())?;
        Ok(())
    }
}
