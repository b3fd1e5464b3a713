//! # Field
//!
//! A named, typed column of a Type, or a free-standing primitive.

use crate::export::ToFibery;
use crate::meta::{HasRecord, Record};
use crate::primitives::{ID_KEY, META_KEY, NAME_KEY, TYPE_KEY};
use crate::raw::{RawFieldRecord, RawTypeRecord};
use crate::types::{BerryfiError, Flag, Flags};
use serde_json::{Value, json};

/// A field definition.
///
/// Read-only state lives in the metadata (`fibery/readonly?`), not in the flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    record: Record,
    field_type: Option<String>,
    parent_type: Option<String>,
}

impl Field {
    /// Build a field from a record nested in a type.
    #[must_use]
    pub fn from_raw(raw: &RawFieldRecord, flags: Flags) -> Self {
        Self {
            record: Record::new(
                raw.id.clone(),
                Some(raw.name.clone()),
                raw.meta.clone(),
                flags,
            ),
            field_type: raw.field_type.clone(),
            parent_type: None,
        }
    }

    /// Build a standalone primitive from a primitive type record.
    #[must_use]
    pub fn primitive(raw: &RawTypeRecord) -> Self {
        Self {
            record: Record::new(
                raw.id.clone(),
                raw.name().map(str::to_string),
                raw.meta.clone(),
                Flag::Primitive | Flag::Field,
            ),
            field_type: None,
            parent_type: None,
        }
    }

    /// The declared remote type tag, e.g. `fibery/text`.
    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    /// Id of the owning type, once appended.
    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    pub(crate) fn set_parent_type(&mut self, type_id: &str) {
        self.parent_type = Some(type_id.to_string());
    }
}

impl HasRecord for Field {
    fn record(&self) -> &Record {
        &self.record
    }
}

impl ToFibery for Field {
    fn to_fibery(&self) -> Result<Value, BerryfiError> {
        Ok(json!({
            NAME_KEY: self.name(),
            TYPE_KEY: self.field_type,
            META_KEY: self.record.meta,
            ID_KEY: self.id(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{HasFlags, HasMeta};

    fn raw_field() -> RawFieldRecord {
        serde_json::from_value(json!({
            "fibery/id": "f1",
            "fibery/name": "Sales/Amount",
            "fibery/type": "fibery/decimal",
            "fibery/meta": {"ui/number-unit": "USD", "fibery/readonly?": true}
        }))
        .expect("field record")
    }

    #[test]
    fn from_raw_keeps_type_and_meta() {
        let field = Field::from_raw(&raw_field(), Flag::UserCreated | Flag::Field);
        assert_eq!(field.id(), "f1");
        assert_eq!(field.label(), "Amount");
        assert_eq!(field.field_type(), Some("fibery/decimal"));
        assert_eq!(field.unit(), Some("USD"));
        assert!(field.is_read_only());
        assert!(field.is_field() && field.is_user_created());
        assert_eq!(field.parent_type(), None);
    }

    #[test]
    fn primitive_from_descriptor_name() {
        let raw: RawTypeRecord = serde_json::from_value(json!({
            "fibery/id": "p1",
            "fibery/name": {"fibery/name": "fibery/int", "fibery/primitive?": true}
        }))
        .expect("type record");
        let field = Field::primitive(&raw);
        assert!(field.is_primitive() && field.is_field());
        assert_eq!(field.name(), Some("fibery/int"));
    }

    #[test]
    fn exports_name_type_meta_id() {
        let field = Field::from_raw(&raw_field(), Flag::UserCreated | Flag::Field);
        let out = field.to_fibery().expect("export");
        assert_eq!(out["fibery/name"], "Sales/Amount");
        assert_eq!(out["fibery/type"], "fibery/decimal");
        assert_eq!(out["fibery/id"], "f1");
        assert_eq!(out["fibery/meta"]["ui/number-unit"], "USD");
    }
}
