//! Drives the whole export pipeline: type selection, per-resource read and
//! filtering, routing to the config and state accumulators, the
//! interpolation pass and the final flush.

use std::collections::HashMap;

use serde_json::{Value, json};
use uuid::Uuid;

use crate::export::error::{ExportError, ExportResult};
use crate::interpolate::interpolate;
use crate::provider::{DiscoveredResource, ResourceProvider, TagFilter};
use crate::schema::{ResourceSchema, ValueAccessor, normalizer::normalize};
use crate::traits::Output;
use crate::writer::{ConfigWriter, ResourceKey, StateWriter};

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Explicit include-list of resource types; empty means all supported
    pub include: Vec<String>,
    /// Types to drop when no include-list is given
    pub exclude: Vec<String>,
    /// Only export resources carrying this tag
    pub tag_filter: Option<TagFilter>,
    /// Whether to produce the configuration artifact
    pub emit_config: bool,
    /// Whether to produce the state snapshot artifact
    pub emit_state: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            tag_filter: None,
            emit_config: true,
            emit_state: true,
        }
    }
}

/// Result of one export run
#[derive(Debug)]
pub struct ExportReport {
    /// Resources routed to at least one sink
    pub exported: usize,
    /// Resources dropped by soft skips
    pub skipped: usize,
    /// Rendered configuration text, when the config sink was enabled
    pub config: Option<String>,
    /// Serialized state document, when the state sink was enabled
    pub state: Option<String>,
}

/// Orchestrates one synthesis run over a provider
pub struct ExportWorkflow<'a> {
    provider: &'a dyn ResourceProvider,
    options: ExportOptions,
    output: &'a dyn Output,
}

impl<'a> ExportWorkflow<'a> {
    pub fn new(
        provider: &'a dyn ResourceProvider,
        options: ExportOptions,
        output: &'a dyn Output,
    ) -> Self {
        Self {
            provider,
            options,
            output,
        }
    }

    /// Execute the export run: one pass, no retries beyond the single
    /// name-collision retry per resource.
    pub fn execute(&self) -> ExportResult<ExportReport> {
        self.output.section("Export");

        let types = self.select_types()?;
        self.output
            .info(&format!("Selected {} resource types", types.len()));

        let mut config = self.options.emit_config.then(ConfigWriter::new);
        let mut state = self.options.emit_state.then(StateWriter::new);
        let mut identities: Vec<(ResourceKey, String)> = Vec::new();
        let mut skipped = 0;

        for resource_type in &types {
            let schema = self.provider.schema(resource_type)?;
            let resources = self.provider.fetch(resource_type)?;
            self.output.info(&format!(
                "Fetched {} {} resources",
                resources.len(),
                resource_type
            ));

            for resource in &resources {
                match self.route(schema, resource, config.as_mut(), state.as_mut()) {
                    Ok(key) => identities.push((key, resource.id.clone())),
                    Err(err) if err.is_soft_skip() => skipped += 1,
                    Err(err) => return Err(err),
                }
            }
        }

        if let Some(writer) = config.as_mut() {
            let substitutions = build_substitutions(&identities);
            interpolate(writer.resources_mut(), &substitutions);
        }

        let mut report = ExportReport {
            exported: identities.len(),
            skipped,
            config: None,
            state: None,
        };

        // flush order: config first, then state
        if let Some(writer) = &config {
            report.config = Some(writer.render());
        }

        if let Some(writer) = &state {
            report.state = Some(writer.sync()?);
        }

        if report.skipped > 0 {
            self.output
                .warning(&format!("Skipped {} resources", report.skipped));
        }

        self.output
            .success(&format!("Exported {} resources", report.exported));
        Ok(report)
    }

    /// Validate the include-list against supported types (hard error), or
    /// take all supported types minus the exclude-list (excluding an
    /// unsupported type is not an error).
    fn select_types(&self) -> ExportResult<Vec<String>> {
        let supported = self.provider.supported_types();

        if !self.options.include.is_empty() {
            for requested in &self.options.include {
                if !supported.contains(requested) {
                    return Err(ExportError::UnsupportedResourceType {
                        resource_type: requested.clone(),
                    });
                }
            }

            return Ok(self.options.include.clone());
        }

        Ok(supported
            .into_iter()
            .filter(|supported_type| !self.options.exclude.contains(supported_type))
            .collect())
    }

    /// Read and filter one resource, then write it to whichever sinks are
    /// configured. A nil sink is a legitimate "don't produce this artifact"
    /// configuration.
    fn route(
        &self,
        schema: &ResourceSchema,
        resource: &DiscoveredResource,
        mut config: Option<&mut ConfigWriter>,
        state: Option<&mut StateWriter>,
    ) -> ExportResult<ResourceKey> {
        if resource.id.is_empty() {
            return Err(ExportError::NotReadable {
                resource_type: resource.resource_type.clone(),
                resource_id: resource.name.clone(),
            });
        }

        if let Some(filter) = &self.options.tag_filter {
            if !filter.matches(&resource.tags) {
                return Err(ExportError::TagMismatch {
                    resource_type: resource.resource_type.clone(),
                    resource_id: resource.id.clone(),
                });
            }
        }

        let accessor = ValueAccessor::new(resource.attributes.clone());
        let attributes = normalize(schema, &accessor, "");

        let mut key = format!("{}.{}", resource.resource_type, resource.name);

        // one retry with a regenerated name; a second collision propagates
        let occupied = match (&config, &state) {
            (Some(writer), _) => writer.has(&key)?,
            (None, Some(writer)) => writer.has(&key),
            (None, None) => false,
        };

        if occupied {
            key = format!(
                "{}.{}-{}",
                resource.resource_type,
                resource.name,
                random_suffix()
            );
        }

        if let Some(writer) = config.as_deref_mut() {
            writer.write(&key, Value::Object(attributes.clone()))?;
        }

        if let Some(writer) = state {
            let blob = if resource.state.is_null() {
                json!({
                    "type": resource.resource_type,
                    "primary": { "id": resource.id, "attributes": attributes }
                })
            } else {
                resource.state.clone()
            };
            writer.write(&key, blob)?;
        }

        ResourceKey::parse(&key)
    }
}

/// Build the literal-to-expression table once per run from the identifying
/// values of every routed resource.
fn build_substitutions(identities: &[(ResourceKey, String)]) -> HashMap<String, String> {
    let mut table = HashMap::new();

    for (key, id) in identities {
        if id.is_empty() {
            continue;
        }

        table.insert(
            id.clone(),
            format!("${{{}.{}.id}}", key.resource_type, key.name),
        );
    }

    table
}

/// Five random lowercase letters for collision-regenerated names
fn random_suffix() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(5)
        .map(|byte| char::from(b'a' + byte % 26))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockOutput;
    use std::collections::BTreeMap;

    struct StubProvider {
        types: BTreeMap<String, (ResourceSchema, Vec<DiscoveredResource>)>,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                types: BTreeMap::new(),
            }
        }

        fn with_type(
            mut self,
            resource_type: &str,
            schema: Value,
            resources: Vec<Value>,
        ) -> Self {
            let schema: ResourceSchema = serde_json::from_value(schema).unwrap();
            let resources = resources
                .into_iter()
                .map(|raw| {
                    let mut resource: DiscoveredResource = serde_json::from_value(raw).unwrap();
                    resource.resource_type = resource_type.to_string();
                    resource
                })
                .collect();
            self.types
                .insert(resource_type.to_string(), (schema, resources));
            self
        }
    }

    impl ResourceProvider for StubProvider {
        fn supported_types(&self) -> Vec<String> {
            self.types.keys().cloned().collect()
        }

        fn schema(&self, resource_type: &str) -> ExportResult<&ResourceSchema> {
            self.types
                .get(resource_type)
                .map(|(schema, _)| schema)
                .ok_or_else(|| ExportError::UnsupportedResourceType {
                    resource_type: resource_type.to_string(),
                })
        }

        fn fetch(&self, resource_type: &str) -> ExportResult<Vec<DiscoveredResource>> {
            self.types
                .get(resource_type)
                .map(|(_, resources)| resources.clone())
                .ok_or_else(|| ExportError::UnsupportedResourceType {
                    resource_type: resource_type.to_string(),
                })
        }
    }

    fn sample_provider() -> StubProvider {
        StubProvider::new()
            .with_type(
                "aws_subnet",
                json!({ "fields": { "cidr_block": { "optional": true } } }),
                vec![json!({
                    "name": "subnet",
                    "id": "subnet-1",
                    "attributes": { "cidr_block": "10.0.1.0/24" },
                    "tags": { "Env": "prod" }
                })],
            )
            .with_type(
                "aws_instance",
                json!({ "fields": {
                    "ami": { "optional": true },
                    "subnet_id": { "optional": true, "computed": true }
                } }),
                vec![json!({
                    "name": "instance",
                    "id": "i-123",
                    "attributes": { "ami": "ami-123", "subnet_id": "subnet-1" },
                    "tags": { "Env": "prod" }
                })],
            )
    }

    fn run(provider: &StubProvider, options: ExportOptions) -> ExportResult<ExportReport> {
        let output = MockOutput::new();
        ExportWorkflow::new(provider, options, &output).execute()
    }

    #[test]
    fn test_full_run_produces_both_artifacts() {
        let provider = sample_provider();

        let report = run(&provider, ExportOptions::default()).unwrap();

        assert_eq!(report.exported, 2);
        assert_eq!(report.skipped, 0);

        let config = report.config.unwrap();
        assert!(config.contains("resource \"aws_subnet\" \"subnet\" {"));
        assert!(config.contains("resource \"aws_instance\" \"instance\" {"));

        let state: Value = serde_json::from_str(&report.state.unwrap()).unwrap();
        let resources = &state["modules"][0]["resources"];
        assert!(resources.get("aws_subnet.subnet").is_some());
        assert!(resources.get("aws_instance.instance").is_some());
    }

    #[test]
    fn test_cross_references_become_interpolations() {
        let provider = sample_provider();

        let report = run(&provider, ExportOptions::default()).unwrap();
        let config = report.config.unwrap();

        assert!(config.contains("subnet_id = aws_subnet.subnet.id"));
        assert!(!config.contains("subnet_id = \"subnet-1\""));
    }

    #[test]
    fn test_unreadable_resource_soft_skipped() {
        let provider = StubProvider::new().with_type(
            "aws_instance",
            json!({ "fields": { "ami": { "optional": true } } }),
            vec![
                json!({ "name": "ok", "id": "i-1", "attributes": { "ami": "a" } }),
                json!({ "name": "broken", "id": "", "attributes": { "ami": "b" } }),
            ],
        );

        let report = run(&provider, ExportOptions::default()).unwrap();

        assert_eq!(report.exported, 1);
        assert_eq!(report.skipped, 1);

        let state: Value = serde_json::from_str(&report.state.unwrap()).unwrap();
        let resources = state["modules"][0]["resources"].as_object().unwrap();
        assert!(resources.contains_key("aws_instance.ok"));
        assert!(!resources.contains_key("aws_instance.broken"));
    }

    #[test]
    fn test_tag_filter_skips_non_matching_resources() {
        let provider = sample_provider();
        let options = ExportOptions {
            tag_filter: Some(TagFilter::parse("Env=staging").unwrap()),
            ..Default::default()
        };

        let report = run(&provider, options).unwrap();

        assert_eq!(report.exported, 0);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_include_list_validated_hard() {
        let provider = sample_provider();
        let options = ExportOptions {
            include: vec!["aws_nonexistent".to_string()],
            ..Default::default()
        };

        assert!(matches!(
            run(&provider, options),
            Err(ExportError::UnsupportedResourceType { .. })
        ));
    }

    #[test]
    fn test_excluding_unsupported_type_is_not_an_error() {
        let provider = sample_provider();
        let options = ExportOptions {
            exclude: vec!["aws_nonexistent".to_string(), "aws_subnet".to_string()],
            ..Default::default()
        };

        let report = run(&provider, options).unwrap();

        assert_eq!(report.exported, 1);
        assert!(!report.config.unwrap().contains("aws_subnet"));
    }

    #[test]
    fn test_name_collision_retried_with_suffix() {
        let provider = StubProvider::new().with_type(
            "aws_instance",
            json!({ "fields": { "ami": { "optional": true } } }),
            vec![
                json!({ "name": "web", "id": "i-1", "attributes": { "ami": "a" } }),
                json!({ "name": "web", "id": "i-2", "attributes": { "ami": "b" } }),
            ],
        );

        let report = run(&provider, ExportOptions::default()).unwrap();

        assert_eq!(report.exported, 2);

        let config = report.config.unwrap();
        assert!(config.contains("resource \"aws_instance\" \"web\" {"));

        let state: Value = serde_json::from_str(&report.state.unwrap()).unwrap();
        let resources = state["modules"][0]["resources"].as_object().unwrap();
        let suffixed: Vec<&String> = resources
            .keys()
            .filter(|key| key.starts_with("aws_instance.web-"))
            .collect();
        assert_eq!(suffixed.len(), 1);
        // base name, dash, five lowercase letters
        let name = suffixed[0].split_once('.').unwrap().1;
        assert_eq!(name.len(), "web-".len() + 5);
    }

    #[test]
    fn test_nil_sinks_are_legitimate() {
        let provider = sample_provider();

        let config_only = run(
            &provider,
            ExportOptions {
                emit_state: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(config_only.config.is_some());
        assert!(config_only.state.is_none());

        let state_only = run(
            &provider,
            ExportOptions {
                emit_config: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(state_only.config.is_none());
        assert!(state_only.state.is_some());
    }

    #[test]
    fn test_build_substitutions_table() {
        let identities = vec![
            (ResourceKey::new("aws_subnet", "subnet"), "subnet-1".to_string()),
            (ResourceKey::new("aws_instance", "web"), String::new()),
        ];

        let table = build_substitutions(&identities);

        assert_eq!(
            table.get("subnet-1"),
            Some(&"${aws_subnet.subnet.id}".to_string())
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_random_suffix_shape() {
        let suffix = random_suffix();

        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase()));
        assert_ne!(random_suffix(), random_suffix());
    }
}
