//! # Export
//!
//! Conversion of local objects back into Fibery's wire shape, and the
//! "clean" view that strips namespaces for callers who do not want them.

use crate::primitives::NAMESPACE_SEPARATOR;
use crate::types::BerryfiError;
use serde_json::{Map, Value};

/// Objects that have a representation in Fibery's native format.
pub trait ToFibery {
    fn to_fibery(&self) -> Result<Value, BerryfiError>;
}

/// Strip namespaces from keys, two levels deep.
///
/// `{"fibery/id": "1", "Person/workplaces": [{"Companies/name": "Fibery"}]}`
/// becomes `{"id": "1", "workplaces": [{"name": "Fibery"}]}`. Objects nested
/// deeper than the second level are kept as they are.
#[must_use]
pub fn clean_object(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| {
            let cleaned = match value {
                Value::Object(inner) => Value::Object(clean_keys(inner)),
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Object(inner) => Value::Object(clean_keys(inner)),
                            other => other.clone(),
                        })
                        .collect(),
                ),
                other => other.clone(),
            };
            (bare_key(key).to_string(), cleaned)
        })
        .collect()
}

fn clean_keys(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .map(|(key, value)| (bare_key(key).to_string(), value.clone()))
        .collect()
}

/// The part after the first separator: `"fibery/public-id"` is `"public-id"`.
fn bare_key(key: &str) -> &str {
    key.split_once(NAMESPACE_SEPARATOR)
        .map_or(key, |(_, rest)| rest)
}
