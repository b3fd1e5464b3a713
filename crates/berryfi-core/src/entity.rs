//! # Entity
//!
//! A single record of a Type, read and written through the field-name
//! resolver.
//!
//! - Keys of the field map are always fully namespaced field names
//! - Unknown reads yield nothing; unknown or read-only writes fail
//! - Local state is replaced in place when the remote supersedes it

use crate::command::{Command, CommandExecutor, execute_one};
use crate::export::{ToFibery, clean_object};
use crate::primitives::{ID_KEY, MODIFICATION_DATE_KEY, PUBLIC_ID_KEY, RANK_KEY};
use crate::timestamp::{generate_entity_id, parse_timestamp, uuid_to_datetime};
use crate::type_def::TypeSchema;
use crate::types::{BerryfiError, Flag, Flags};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A record conforming to a Type's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    schema: Arc<TypeSchema>,
    data: Map<String, Value>,
    flags: Flags,
}

impl Entity {
    /// Create an entity bound to `schema`.
    ///
    /// A v1 UUID is generated when `data` carries no id. The field map is
    /// validated immediately, so every key must resolve against the type.
    pub fn new(schema: Arc<TypeSchema>, mut data: Map<String, Value>) -> Result<Self, BerryfiError> {
        let has_id = data.get(ID_KEY).is_some_and(|id| !id.is_null());
        if !has_id {
            data.insert(ID_KEY.to_string(), Value::String(generate_entity_id()));
        }

        let mut entity = Self::from_remote(schema, data);
        entity.validate()?;
        Ok(entity)
    }

    /// Wrap a record returned by Fibery as-is.
    pub(crate) fn from_remote(schema: Arc<TypeSchema>, data: Map<String, Value>) -> Self {
        Self {
            schema,
            data,
            flags: Flag::UserCreated | Flag::Entity,
        }
    }

    pub(crate) fn rebind(&mut self, schema: Arc<TypeSchema>) {
        self.schema = schema;
    }

    // =========================================================================
    // FIELD ACCESS
    // =========================================================================

    /// Read a field by short or full name. Unknown names yield `None`.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        let full = self.schema.resolve(name)?;
        self.data.get(full)
    }

    /// Write a field by short or full name, returning the previous value.
    ///
    /// # Errors
    /// `UnknownField` (listing the valid names) when `name` does not resolve,
    /// `ReadOnlyField` when it resolves to a read-only field.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<Option<Value>, BerryfiError> {
        let full = self
            .schema
            .resolve(name)
            .ok_or_else(|| BerryfiError::UnknownField {
                field: name.to_string(),
                type_name: self.schema.name().to_string(),
                valid: self.schema.field_names().to_vec(),
            })?
            .to_string();

        if self.schema.is_read_only(&full) {
            return Err(BerryfiError::ReadOnlyField(full));
        }

        Ok(self.data.insert(full, value))
    }

    /// Remove a field by short or full name. Unknown names are a no-op.
    pub fn delete_field(&mut self, name: &str) -> Option<Value> {
        let full = self.schema.resolve(name)?.to_string();
        self.data.remove(&full)
    }

    /// Re-key every entry through the resolver and return an independent copy.
    ///
    /// # Errors
    /// `FieldMismatch` when a key no longer resolves against the type.
    pub fn validate(&mut self) -> Result<Map<String, Value>, BerryfiError> {
        let corrected = self.schema.rekey(&self.data)?;
        self.data = corrected.clone();
        Ok(corrected)
    }

    /// The validated map with read-only and null fields removed. The id stays.
    fn outgoing(&mut self) -> Result<Map<String, Value>, BerryfiError> {
        self.validate()?;
        self.schema.outgoing(&self.data)
    }

    // =========================================================================
    // REMOTE OPERATIONS
    // =========================================================================

    /// Create this entity in Fibery and adopt the record it returns.
    pub async fn insert(&mut self, executor: &dyn CommandExecutor) -> Result<(), BerryfiError> {
        let payload = self.outgoing()?;
        let command = Command::create_entity(self.schema.name(), payload);
        let result = execute_one(executor, command).await?;

        let Value::Object(mut record) = result else {
            return Err(BerryfiError::UnexpectedResponse(format!(
                "create of {} returned a non-object result",
                self.schema.name()
            )));
        };
        if !record.contains_key(ID_KEY) {
            record.insert(ID_KEY.to_string(), Value::String(self.id().to_string()));
        }

        tracing::debug!(entity = %self.id(), type_name = %self.schema.name(), "entity created");
        self.data = record;
        Ok(())
    }

    /// Send local changes to Fibery. Local state is left untouched.
    pub async fn push(&mut self, executor: &dyn CommandExecutor) -> Result<Value, BerryfiError> {
        let payload = self.outgoing()?;
        let command = Command::update_entity(self.schema.name(), payload);
        execute_one(executor, command).await
    }

    /// Re-read this entity from Fibery, selecting the keys it currently holds.
    ///
    /// # Errors
    /// `EntityNotFound` when the query returns no row, `FieldMismatch` when
    /// the fresh record no longer fits the type. Local state is kept on error.
    pub async fn pull(&mut self, executor: &dyn CommandExecutor) -> Result<(), BerryfiError> {
        let id = self.id().to_string();
        let mut select: Vec<String> = self.data.keys().cloned().collect();
        if !select.iter().any(|key| key == ID_KEY) {
            select.push(ID_KEY.to_string());
        }

        let command = Command::query_entity(self.schema.name(), &id, select);
        let result = execute_one(executor, command).await?;

        let row = match result {
            Value::Array(rows) => rows.into_iter().next(),
            Value::Object(row) => Some(Value::Object(row)),
            _ => None,
        };
        let Some(Value::Object(record)) = row else {
            return Err(BerryfiError::EntityNotFound(id));
        };

        self.data = self.schema.rekey(&record)?;
        Ok(())
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    pub fn id(&self) -> &str {
        self.data.get(ID_KEY).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn rank(&self) -> Option<i64> {
        self.data.get(RANK_KEY).and_then(Value::as_i64)
    }

    pub fn public_id(&self) -> Option<&str> {
        self.data.get(PUBLIC_ID_KEY).and_then(Value::as_str)
    }

    /// Last modification time, when the record carries one.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.data
            .get(MODIFICATION_DATE_KEY)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    }

    /// Creation time decoded from the v1 id.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        uuid_to_datetime(self.id())
    }

    pub fn app_name(&self) -> Option<&str> {
        self.schema.app()
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    pub fn type_label(&self) -> &str {
        self.schema.label()
    }

    pub fn type_id(&self) -> &str {
        self.schema.id()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// The raw field map, keyed by full names.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The field map with namespaces stripped from its keys.
    pub fn to_object(&self) -> Map<String, Value> {
        clean_object(&self.data)
    }
}

impl ToFibery for Entity {
    fn to_fibery(&self) -> Result<Value, BerryfiError> {
        Ok(Value::Object(self.data.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
