//! Converts accumulated attribute maps into the structural block text the
//! canonicalizer expects.
//!
//! The structural rule lives here: a list of nested maps becomes N sibling
//! blocks of the same block type; everything else prints as a JSON-shaped
//! attribute and is repaired textually downstream.

use serde_json::Value;

use crate::writer::ResourceKey;

const INDENT: &str = "  ";

/// Print one `resource "type" "name" { ... }` block per accumulated entry,
/// in accumulator order.
pub fn print_document(resources: &[(ResourceKey, Value)]) -> String {
    let mut out = String::new();

    for (key, attributes) in resources {
        out.push_str(&format!(
            "\"resource\" \"{}\" \"{}\" {{\n",
            key.resource_type, key.name
        ));

        if let Value::Object(map) = attributes {
            for (field, value) in map {
                print_field(&mut out, 1, field, value);
            }
        }

        out.push_str("}\n");
    }

    out
}

fn print_field(out: &mut String, depth: usize, key: &str, value: &Value) {
    let pad = INDENT.repeat(depth);

    match value {
        // An empty repeated block emits nothing at all
        Value::Array(items) if items.is_empty() => {}
        Value::Array(items) if items.iter().all(Value::is_object) => {
            for item in items {
                out.push_str(&format!("{}{} {{\n", pad, key));

                if let Value::Object(map) = item {
                    for (field, nested) in map {
                        print_field(out, depth + 1, field, nested);
                    }
                }

                out.push_str(&format!("{}}}\n", pad));
            }
        }
        Value::Object(map) => {
            out.push_str(&format!("{}\"{}\" = {{\n", pad, key));

            for (field, nested) in map {
                print_field(out, depth + 1, field, nested);
            }

            out.push_str(&format!("{}}}\n", pad));
        }
        scalar_or_list => {
            out.push_str(&format!("{}\"{}\" = {}\n", pad, key, scalar_or_list));
        }
    }
}
