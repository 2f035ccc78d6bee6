//! Produces a declarative-only attribute map from a schema + live-value pair.

use serde_json::{Map, Value};

use super::{AttributeAccessor, Multiplicity, ResourceSchema, ValueAccessor};

/// Marker appended to a key whose object value is a map-typed attribute
/// (e.g. a tag map) rather than a nested configuration block. Applied at
/// every nesting level of such a value. The canonicalizer keeps markered
/// keys as `key = { ... }` and strips the marker from the emitted text.
pub const MAP_ATTR_MARKER: &str = "__map_attr__";

/// Walk `schema` against the live values behind `accessor` and collect the
/// fields that belong in declarative configuration.
///
/// Skips purely computed and deprecated fields, descends into nested block
/// schemas, honors "required even if empty" and field conflicts
/// (first accepted field wins).
pub fn normalize(
    schema: &ResourceSchema,
    accessor: &dyn AttributeAccessor,
    prefix: &str,
) -> Map<String, Value> {
    let mut attributes = Map::new();

    for (name, field) in &schema.fields {
        if field.deprecated || field.is_computed_only() {
            continue;
        }

        let path = join_path(prefix, name);

        if let Some(elem) = &field.elem {
            match field.multi_valued {
                Multiplicity::Set => {
                    let occurrences = accessor.occurrences(&path);

                    if occurrences.is_empty() {
                        continue;
                    }

                    let blocks: Vec<Value> = occurrences
                        .into_iter()
                        .map(|occurrence| {
                            Value::Object(normalize(elem, &ValueAccessor::new(occurrence), ""))
                        })
                        .collect();
                    attributes.insert(name.clone(), Value::Array(blocks));
                }
                Multiplicity::List => {
                    let mut blocks = Vec::new();
                    let mut index = 0;

                    while accessor.get(&format!("{}.{}", path, index)).is_some() {
                        let indexed = format!("{}.{}", path, index);
                        blocks.push(Value::Object(normalize(elem, accessor, &indexed)));
                        index += 1;
                    }

                    if blocks.is_empty() {
                        continue;
                    }

                    attributes.insert(name.clone(), Value::Array(blocks));
                }
                Multiplicity::None => {
                    let nested = normalize(elem, accessor, &path);

                    if nested.is_empty() {
                        continue;
                    }

                    attributes.insert(name.clone(), Value::Object(nested));
                }
            }

            continue;
        }

        let value = match accessor.get(&path) {
            Some(value) => value,
            // required even if empty
            None if field.required => Value::String(String::new()),
            None => continue,
        };

        if conflicts_with_accepted(&attributes, &field.conflicts_with) {
            continue;
        }

        let value = normalize_value(value);
        let key = if value.is_object() {
            format!("{}{}", name, MAP_ATTR_MARKER)
        } else {
            name.clone()
        };
        attributes.insert(key, value);
    }

    attributes
}

/// First writer wins: skip this field if any already-accepted field appears
/// in its conflicts-with set.
fn conflicts_with_accepted(attributes: &Map<String, Value>, conflicts: &[String]) -> bool {
    conflicts.iter().any(|other| {
        attributes.contains_key(other)
            || attributes.contains_key(&format!("{}{}", other, MAP_ATTR_MARKER))
    })
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = normalize_value(value);
                    // inner maps stay attribute-shaped too
                    let key = if value.is_object() {
                        format!("{}{}", key, MAP_ATTR_MARKER)
                    } else {
                        key
                    };
                    (key, value)
                })
                .collect(),
        ),
        other => other,
    }
}

/// Strip embedded newlines and escape interpolation-looking substrings so a
/// literal `${...}` survives the later JSON round trip.
fn normalize_string(s: &str) -> String {
    s.replace('\n', "").replace("${", "$${")
}
