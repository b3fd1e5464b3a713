//! # Base Record
//!
//! Attributes shared by Apps, Types and Fields, plus the capability traits
//! that expose metadata and flag predicates.
//!
//! Metadata predicates are verbatim single-key lookups: an absent key reads
//! as `false` or `None`, never as a computed default.

use crate::primitives::{
    META_COLLECTION, META_COLOR, META_DEFAULT_VALUE, META_DOMAIN, META_ID, META_MIXIN,
    META_MIXIN_CREATE_RELATION, META_MIXIN_ICON, META_MIXINS, META_MODIFICATION_DATE,
    META_NUMBER_UNIT, META_OBJECT_EDITOR_ORDER, META_PRECISION, META_PRIMITIVE, META_PUBLIC_ID,
    META_READONLY, META_RELATION, META_REQUIRED, META_SECURED, META_SHOW_IN_MENU, META_TITLE,
    META_UNIQUE, UNNAMED_LABEL, short_name,
};
use crate::timestamp::uuid_to_datetime;
use crate::types::{Flag, Flags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// META
// =============================================================================

/// The open attribute bag found under `fibery/meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(Map<String, Value>);

impl Meta {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Boolean under `key`; anything other than `true` reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// String under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Integer under `key`.
    pub fn number(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// Set `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Meta {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// Common attributes of every schema object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Remote id. Apps use their name.
    pub id: String,
    /// Namespaced name, `App/Name`.
    pub name: Option<String>,
    pub meta: Meta,
    pub flags: Flags,
}

impl Record {
    /// Create a record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: Option<String>, meta: Meta, flags: Flags) -> Self {
        Self {
            id: id.into(),
            name,
            meta,
            flags,
        }
    }
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Objects built on a [`Record`].
pub trait HasRecord {
    fn record(&self) -> &Record;

    fn id(&self) -> &str {
        &self.record().id
    }

    /// Namespaced name, if any.
    fn name(&self) -> Option<&str> {
        self.record().name.as_deref()
    }

    /// Readable name: the part after the last namespace separator.
    fn label(&self) -> &str {
        self.name().map_or(UNNAMED_LABEL, short_name)
    }

    /// Creation time decoded from a v1 UUID id.
    fn created(&self) -> Option<DateTime<Utc>> {
        uuid_to_datetime(self.id())
    }
}

impl HasRecord for Record {
    fn record(&self) -> &Record {
        self
    }
}

/// Bitwise predicates over an object's [`Flags`].
pub trait HasFlags {
    fn flags(&self) -> Flags;

    fn is_app(&self) -> bool {
        self.flags().contains(Flag::App)
    }

    fn is_type(&self) -> bool {
        self.flags().contains(Flag::Type)
    }

    fn is_field(&self) -> bool {
        self.flags().contains(Flag::Field)
    }

    fn is_entity(&self) -> bool {
        self.flags().contains(Flag::Entity)
    }

    fn is_user_created(&self) -> bool {
        self.flags().contains(Flag::UserCreated)
    }

    fn is_auxiliary_type(&self) -> bool {
        self.flags().contains(Flag::AuxiliaryType)
    }

    fn is_auxiliary_field(&self) -> bool {
        self.flags().contains(Flag::AuxiliaryField)
    }

    fn is_auxiliary(&self) -> bool {
        self.is_auxiliary_field() || self.is_auxiliary_type()
    }

    fn is_primitive(&self) -> bool {
        self.flags().contains(Flag::Primitive)
    }
}

impl<T: HasRecord> HasFlags for T {
    fn flags(&self) -> Flags {
        self.record().flags
    }
}

/// Verbatim lookups into an object's [`Meta`].
pub trait HasMeta {
    fn meta(&self) -> &Meta;

    fn is_secure(&self) -> bool {
        self.meta().flag(META_SECURED)
    }

    fn has_modification_date(&self) -> bool {
        self.meta().flag(META_MODIFICATION_DATE)
    }

    fn is_id(&self) -> bool {
        self.meta().flag(META_ID)
    }

    fn is_read_only(&self) -> bool {
        self.meta().flag(META_READONLY)
    }

    fn default_value(&self) -> Option<&Value> {
        self.meta().get(META_DEFAULT_VALUE)
    }

    fn object_editor_order(&self) -> Option<i64> {
        self.meta().number(META_OBJECT_EDITOR_ORDER)
    }

    fn is_title(&self) -> bool {
        self.meta().flag(META_TITLE)
    }

    fn required(&self) -> bool {
        self.meta().flag(META_REQUIRED)
    }

    fn is_public_id(&self) -> bool {
        self.meta().flag(META_PUBLIC_ID)
    }

    fn collection(&self) -> bool {
        self.meta().flag(META_COLLECTION)
    }

    fn relation(&self) -> Option<&str> {
        self.meta().text(META_RELATION)
    }

    fn primitive(&self) -> bool {
        self.meta().flag(META_PRIMITIVE)
    }

    fn domain(&self) -> bool {
        self.meta().flag(META_DOMAIN)
    }

    fn unit(&self) -> Option<&str> {
        self.meta().text(META_NUMBER_UNIT)
    }

    fn precision(&self) -> Option<i64> {
        self.meta().number(META_PRECISION)
    }

    fn mixins(&self) -> Option<&Value> {
        self.meta().get(META_MIXINS)
    }

    fn is_mixin(&self) -> bool {
        self.meta().flag(META_MIXIN)
    }

    fn color(&self) -> Option<&str> {
        self.meta().text(META_COLOR)
    }

    fn mixin_create_relation(&self) -> bool {
        self.meta().flag(META_MIXIN_CREATE_RELATION)
    }

    fn icon(&self) -> Option<&str> {
        self.meta().text(META_MIXIN_ICON)
    }

    fn show_in_menu(&self) -> bool {
        self.meta().flag(META_SHOW_IN_MENU)
    }

    fn unique(&self) -> bool {
        self.meta().flag(META_UNIQUE)
    }
}

impl<T: HasRecord> HasMeta for T {
    fn meta(&self) -> &Meta {
        &self.record().meta
    }
}

// =============================================================================
// TESTS
// =============================================================================
