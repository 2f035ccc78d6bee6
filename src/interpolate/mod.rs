//! Reference resolution: rewrites literal values that identify other
//! discovered resources into symbolic cross-resource expressions.
//!
//! The cycle guards here are deliberate heuristics. They block
//! self-reference, same-type reference and mutual interpolation, but do not
//! compute a full reference graph; longer cycles (A->B->C->A) pass through.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::writer::ResourceKey;

/// Accepted interpolation relations for one synthesis run.
///
/// Holds unordered resource pairs: once two resources are linked by a
/// substitution, no second substitution may link them again in either
/// direction. Explicitly scoped so concurrent runs and tests never share
/// relation state.
#[derive(Debug, Default)]
pub struct InterpolationState {
    relations: HashSet<(ResourceKey, ResourceKey)>,
}

impl InterpolationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair(a: &ResourceKey, b: &ResourceKey) -> (ResourceKey, ResourceKey) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    /// Whether a relation already exists between the two resources,
    /// regardless of direction
    pub fn related(&self, a: &ResourceKey, b: &ResourceKey) -> bool {
        self.relations.contains(&Self::pair(a, b))
    }

    pub fn record(&mut self, source: &ResourceKey, target: &ResourceKey) {
        self.relations.insert(Self::pair(source, target));
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Walk every resource's attribute tree and rewrite leaf string values that
/// match the substitution table into symbolic references, in place.
///
/// The table maps a literal value (e.g. a resource ID) to a
/// `${type.name.attribute}` expression. Accepted substitutions store the
/// expression in HCL-escaped form so the canonicalizer's interpolation rule
/// picks it up.
pub fn interpolate(
    resources: &mut [(ResourceKey, Value)],
    substitutions: &HashMap<String, String>,
) -> InterpolationState {
    let mut state = InterpolationState::new();

    for (key, attributes) in resources.iter_mut() {
        walk(key, attributes, substitutions, &mut state);
    }

    state
}

fn walk(
    key: &ResourceKey,
    value: &mut Value,
    substitutions: &HashMap<String, String>,
    state: &mut InterpolationState,
) {
    match value {
        Value::String(literal) => {
            let Some(expression) = substitutions.get(literal) else {
                return;
            };
            let Some(target) = parse_target(expression) else {
                return;
            };

            // interpolaception guard: never reference back into ourselves
            if target.name.contains(&key.name) {
                return;
            }

            // same-type references are a cycle risk through the same field
            if target.resource_type == key.resource_type {
                return;
            }

            // at most one edge between any two resources per run
            if state.related(key, &target) {
                return;
            }

            state.record(key, &target);
            *value = Value::String(expression.replace("${", "$${"));
        }
        Value::Array(items) => {
            for item in items {
                walk(key, item, substitutions, state);
            }
        }
        Value::Object(map) => {
            for (_, nested) in map.iter_mut() {
                walk(key, nested, substitutions, state);
            }
        }
        // numbers, bools and nulls are never substituted
        _ => {}
    }
}

/// Extract the target `(type, name)` from a `${type.name.attribute}`
/// expression. Malformed expressions yield no target and the substitution
/// is rejected.
fn parse_target(expression: &str) -> Option<ResourceKey> {
    let inner = expression.strip_prefix("${")?.strip_suffix('}')?;
    let mut segments = inner.split('.');
    let resource_type = segments.next()?;
    let name = segments.next()?;

    if resource_type.is_empty() || name.is_empty() {
        return None;
    }

    Some(ResourceKey::new(resource_type, name))
}
