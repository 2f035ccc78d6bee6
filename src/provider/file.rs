//! Provider backed by a JSON scan dump produced by an external scanner.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{DiscoveredResource, ResourceProvider};
use crate::export::error::{ExportError, ExportResult};
use crate::schema::ResourceSchema;

#[derive(Debug, Deserialize)]
struct ProviderDump {
    /// Resource type name to its schema and scan results.
    /// BTreeMap keeps type iteration order stable across runs.
    types: BTreeMap<String, TypeDump>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TypeDump {
    schema: ResourceSchema,
    resources: Vec<DiscoveredResource>,
}

/// Loads a provider scan dump once and serves reads from memory, so results
/// are deterministic within one synthesis run.
pub struct FileProvider {
    dump: ProviderDump,
}

impl FileProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider dump: {}", path.display()))?;
        let dump: ProviderDump =
            serde_json::from_str(&content).context("Failed to parse provider dump as JSON")?;

        Ok(Self { dump })
    }

    #[cfg(test)]
    fn from_json(content: &str) -> Self {
        Self {
            dump: serde_json::from_str(content).unwrap(),
        }
    }
}

impl ResourceProvider for FileProvider {
    fn supported_types(&self) -> Vec<String> {
        self.dump.types.keys().cloned().collect()
    }

    fn schema(&self, resource_type: &str) -> ExportResult<&ResourceSchema> {
        self.dump
            .types
            .get(resource_type)
            .map(|entry| &entry.schema)
            .ok_or_else(|| ExportError::UnsupportedResourceType {
                resource_type: resource_type.to_string(),
            })
    }

    fn fetch(&self, resource_type: &str) -> ExportResult<Vec<DiscoveredResource>> {
        let entry = self.dump.types.get(resource_type).ok_or_else(|| {
            ExportError::UnsupportedResourceType {
                resource_type: resource_type.to_string(),
            }
        })?;

        Ok(entry
            .resources
            .iter()
            .map(|resource| {
                let mut resource = resource.clone();
                resource.resource_type = resource_type.to_string();
                resource
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "types": {
            "aws_instance": {
                "schema": { "fields": { "ami": { "required": true } } },
                "resources": [
                    { "name": "web", "id": "i-123", "attributes": { "ami": "ami-123" } }
                ]
            },
            "aws_subnet": {}
        }
    }"#;

    #[test]
    fn test_supported_types() {
        let provider = FileProvider::from_json(DUMP);

        assert_eq!(provider.supported_types(), ["aws_instance", "aws_subnet"]);
    }

    #[test]
    fn test_schema_lookup() {
        let provider = FileProvider::from_json(DUMP);

        let schema = provider.schema("aws_instance").unwrap();
        assert!(schema.fields["ami"].required);

        assert!(matches!(
            provider.schema("aws_nonexistent"),
            Err(ExportError::UnsupportedResourceType { .. })
        ));
    }

    #[test]
    fn test_fetch_fills_resource_type() {
        let provider = FileProvider::from_json(DUMP);

        let resources = provider.fetch("aws_instance").unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].resource_type, "aws_instance");
        assert_eq!(resources[0].name, "web");
        assert_eq!(resources[0].id, "i-123");
    }

    #[test]
    fn test_fetch_empty_type() {
        let provider = FileProvider::from_json(DUMP);

        assert!(provider.fetch("aws_subnet").unwrap().is_empty());
    }
}
