//! # Raw Schema Records
//!
//! The wire shapes returned by `fibery.schema/query`: a flat, unordered list
//! of type records, each with its nested field records, plus the workspace
//! identity that travels alongside them.

use crate::meta::Meta;
use crate::primitives::{
    ID_KEY, META_KEY, META_MAINTENANCE, META_PRIMITIVE, META_REL_VERSION, NAME_KEY, TYPES_KEY,
    VERSION_KEY,
};
use crate::types::BerryfiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// RAW NAME
// =============================================================================

/// The `fibery/name` of a type record.
///
/// Usually a plain namespaced string. Some primitive records carry a
/// descriptor object instead, which may declare itself primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawName {
    Plain(String),
    Descriptor(Map<String, Value>),
}

impl RawName {
    /// The namespaced name, if one can be found.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawName::Plain(name) => Some(name),
            RawName::Descriptor(map) => map.get(NAME_KEY).and_then(Value::as_str),
        }
    }

    /// Whether a descriptor name declares itself primitive.
    pub fn declares_primitive(&self) -> bool {
        match self {
            RawName::Plain(_) => false,
            RawName::Descriptor(map) => map
                .get(META_PRIMITIVE)
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

// =============================================================================
// RAW RECORDS
// =============================================================================

/// A field definition nested in a type record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFieldRecord {
    #[serde(rename = "fibery/id")]
    pub id: String,
    #[serde(rename = "fibery/name")]
    pub name: String,
    #[serde(rename = "fibery/type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(rename = "fibery/meta", default)]
    pub meta: Meta,
}

/// One entry of the schema's `fibery/types` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTypeRecord {
    #[serde(rename = "fibery/id")]
    pub id: String,
    #[serde(rename = "fibery/name")]
    pub name: RawName,
    #[serde(rename = "fibery/meta", default)]
    pub meta: Meta,
    #[serde(rename = "fibery/fields", default)]
    pub fields: Vec<RawFieldRecord>,
}

impl RawTypeRecord {
    /// The namespaced name, if the record has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_str()
    }
}

/// Extract the type list from a schema query result.
///
/// A null result or a result without `fibery/types` is fatal: ingestion
/// cannot proceed without schema data.
pub fn parse_type_records(result: &Value) -> Result<Vec<RawTypeRecord>, BerryfiError> {
    let list = result
        .get(TYPES_KEY)
        .and_then(Value::as_array)
        .ok_or(BerryfiError::MissingSchema)?;

    list.iter()
        .enumerate()
        .map(|(i, raw)| {
            serde_json::from_value(raw.clone())
                .map_err(|e| BerryfiError::MalformedRecord(format!("type #{i}: {e}")))
        })
        .collect()
}

// =============================================================================
// WORKSPACE INFO
// =============================================================================

/// Workspace identity and version, as reported with the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: Option<String>,
    pub version: Option<String>,
    pub meta_version: Option<String>,
    pub release: Option<String>,
    pub maintenance: Option<bool>,
}

impl WorkspaceInfo {
    /// Read the identity fields of a schema query result.
    #[must_use]
    pub fn from_schema(result: &Value) -> Self {
        let meta = result.get(META_KEY);
        Self {
            id: scalar_text(result.get(ID_KEY)),
            version: scalar_text(result.get(VERSION_KEY)),
            meta_version: scalar_text(meta.and_then(|m| m.get(VERSION_KEY))),
            release: scalar_text(meta.and_then(|m| m.get(META_REL_VERSION))),
            maintenance: meta
                .and_then(|m| m.get(META_MAINTENANCE))
                .and_then(Value::as_bool),
        }
    }
}

/// Versions arrive either as strings or as numbers.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
