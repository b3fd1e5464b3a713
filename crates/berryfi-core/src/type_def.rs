//! # Type
//!
//! A schema-level definition that owns its Fields and Entities.
//!
//! Entities do not point back at their Type. They share a read-only
//! [`TypeSchema`] snapshot instead (id, name, app, field names, read-only
//! set), which the Type refreshes whenever its field set changes.

use crate::app::App;
use crate::collection::Collection;
use crate::command::{Command, CommandExecutor, execute_checked};
use crate::entity::Entity;
use crate::export::ToFibery;
use crate::field::Field;
use crate::meta::{HasFlags, HasMeta, HasRecord, Record};
use crate::primitives::{FIELDS_KEY, ID_KEY, META_KEY, NAME_KEY, resolve_id, short_name};
use crate::raw::RawTypeRecord;
use crate::resolver;
use crate::types::{BerryfiError, Flags};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;

// =============================================================================
// TYPE SCHEMA
// =============================================================================

/// What an Entity needs to know about its Type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    id: String,
    name: String,
    app: Option<String>,
    field_names: Vec<String>,
    read_only: BTreeSet<String>,
}

impl TypeSchema {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        app: Option<String>,
        field_names: Vec<String>,
        read_only: BTreeSet<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            app,
            field_names,
            read_only,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        short_name(&self.name)
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    /// Fully namespaced names of every declared field, in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn is_read_only(&self, full_name: &str) -> bool {
        self.read_only.contains(full_name)
    }

    /// Resolve a short or full field name. The id key always resolves.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        resolver::resolve(&self.field_names, name).or_else(|| resolve_id(name))
    }

    /// `record` with every key replaced by its full field name.
    ///
    /// # Errors
    /// `FieldMismatch` for the first key that does not resolve.
    pub fn rekey(&self, record: &Map<String, Value>) -> Result<Map<String, Value>, BerryfiError> {
        let mut corrected = Map::new();
        for (key, value) in record {
            let full = self.resolve(key).ok_or_else(|| BerryfiError::FieldMismatch {
                key: key.clone(),
                type_name: self.name.clone(),
            })?;
            corrected.insert(full.to_string(), value.clone());
        }
        Ok(corrected)
    }

    /// The re-keyed record as sent to Fibery: null and read-only fields
    /// dropped, the id kept.
    pub(crate) fn outgoing(
        &self,
        record: &Map<String, Value>,
    ) -> Result<Map<String, Value>, BerryfiError> {
        let mut payload = self.rekey(record)?;
        payload.retain(|key, value| {
            !value.is_null() && (key == ID_KEY || !self.is_read_only(key))
        });
        Ok(payload)
    }
}

// =============================================================================
// MEMBERS
// =============================================================================

/// Any object of the schema graph, for kind-dispatched appends.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    App(App),
    Type(Box<Type>),
    Field(Field),
    Entity(Entity),
}

impl SchemaNode {
    pub fn flags(&self) -> Flags {
        match self {
            SchemaNode::App(app) => app.flags(),
            SchemaNode::Type(ty) => ty.flags(),
            SchemaNode::Field(field) => field.flags(),
            SchemaNode::Entity(entity) => entity.flags(),
        }
    }
}

impl From<Field> for SchemaNode {
    fn from(field: Field) -> Self {
        SchemaNode::Field(field)
    }
}

impl From<Entity> for SchemaNode {
    fn from(entity: Entity) -> Self {
        SchemaNode::Entity(entity)
    }
}

impl From<App> for SchemaNode {
    fn from(app: App) -> Self {
        SchemaNode::App(app)
    }
}

impl From<Type> for SchemaNode {
    fn from(ty: Type) -> Self {
        SchemaNode::Type(Box::new(ty))
    }
}

/// Input of [`Type::insert`]: one record or many.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertData {
    One(Map<String, Value>),
    Many(Vec<Map<String, Value>>),
}

impl From<Map<String, Value>> for InsertData {
    fn from(record: Map<String, Value>) -> Self {
        InsertData::One(record)
    }
}

impl From<Vec<Map<String, Value>>> for InsertData {
    fn from(records: Vec<Map<String, Value>>) -> Self {
        InsertData::Many(records)
    }
}

/// Output of [`Type::insert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted {
    /// The command results exactly as Fibery returned them.
    Raw(Vec<Value>),
    /// The created records, wrapped and registered.
    Entities(Vec<Entity>),
}

// =============================================================================
// TYPE
// =============================================================================

/// A Fibery type with its fields and the entities created through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    record: Record,
    schema: Arc<TypeSchema>,
    fields: Collection<String, Field>,
    entities: Collection<String, Entity>,
}

impl Type {
    /// Create an empty type from a raw record. Nested fields are appended separately.
    #[must_use]
    pub fn new(raw: &RawTypeRecord, flags: Flags) -> Self {
        let name = raw.name().map(str::to_string);
        let schema = TypeSchema::new(
            raw.id.clone(),
            name.clone().unwrap_or_else(|| raw.id.clone()),
            None,
            Vec::new(),
            BTreeSet::new(),
        );
        Self {
            record: Record::new(raw.id.clone(), name, raw.meta.clone(), flags),
            schema: Arc::new(schema),
            fields: Collection::new(),
            entities: Collection::new(),
        }
    }

    pub fn schema(&self) -> &Arc<TypeSchema> {
        &self.schema
    }

    /// Name of the owning app. Auxiliary types have none.
    pub fn app(&self) -> Option<&str> {
        self.schema.app()
    }

    pub fn fields(&self) -> &Collection<String, Field> {
        &self.fields
    }

    pub fn entities(&self) -> &Collection<String, Entity> {
        &self.entities
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(&id.to_string())
    }

    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(&id.to_string())
    }

    pub fn field_names(&self) -> &[String] {
        self.schema.field_names()
    }

    /// Resolve a short or full field name against this type.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.schema.resolve(name)
    }

    /// Find a field by short or full name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        let full = self.resolve(name)?;
        self.fields.find(|field, _, _| field.name() == Some(full))
    }

    pub(crate) fn set_app(&mut self, app: &str) {
        Arc::make_mut(&mut self.schema).app = Some(app.to_string());
        self.rebind_entities();
    }

    fn rebind_entities(&mut self) {
        for entity in self.entities.values_mut() {
            entity.rebind(Arc::clone(&self.schema));
        }
    }

    // =========================================================================
    // APPEND
    // =========================================================================

    /// Append a Field or an Entity. Any other kind is rejected.
    pub fn append(&mut self, node: impl Into<SchemaNode>) -> Result<(), BerryfiError> {
        match node.into() {
            SchemaNode::Field(field) => self.append_field(field),
            SchemaNode::Entity(entity) => self.append_entity(entity),
            other => Err(BerryfiError::InvalidMember {
                expected: "Field or Entity".to_string(),
                got: other.flags().to_string(),
            }),
        }
    }

    /// Adopt `field`, updating the field-name and read-only sets.
    ///
    /// # Errors
    /// `OwnerConflict` when the field already belongs to another type.
    pub fn append_field(&mut self, mut field: Field) -> Result<(), BerryfiError> {
        if let Some(owner) = field.parent_type().filter(|owner| *owner != self.id()) {
            return Err(BerryfiError::OwnerConflict {
                object: format!("Field {}", field.id()),
                owner: owner.to_string(),
            });
        }
        field.set_parent_type(self.id());

        if let Some(name) = field.name() {
            let schema = Arc::make_mut(&mut self.schema);
            if !schema.field_names.iter().any(|known| known == name) {
                schema.field_names.push(name.to_string());
            }
            if field.is_read_only() {
                schema.read_only.insert(name.to_string());
            } else {
                schema.read_only.remove(name);
            }
        }

        self.fields.set(field.id().to_string(), field);
        self.rebind_entities();
        Ok(())
    }

    /// Adopt `entity`, which must have been built for this type.
    pub fn append_entity(&mut self, mut entity: Entity) -> Result<(), BerryfiError> {
        if entity.type_id() != self.id() {
            return Err(BerryfiError::OwnerConflict {
                object: format!("Entity {}", entity.id()),
                owner: entity.type_name().to_string(),
            });
        }
        entity.rebind(Arc::clone(&self.schema));
        self.entities.set(entity.id().to_string(), entity);
        Ok(())
    }

    // =========================================================================
    // ENTITIES
    // =========================================================================

    /// Build and register an entity locally. Nothing is sent to Fibery.
    pub fn make_entity(&mut self, data: Map<String, Value>) -> Result<&mut Entity, BerryfiError> {
        let entity = Entity::new(Arc::clone(&self.schema), data)?;
        let id = entity.id().to_string();
        Ok(self.entities.upsert(id, entity))
    }

    /// Create one or many records in Fibery.
    ///
    /// A single record is sent as one create command; a list is wrapped in one
    /// batch command. Keys are resolved like entity fields, and null or
    /// read-only values are dropped. Every returned record is registered as
    /// an Entity.
    ///
    /// # Errors
    /// `FieldMismatch` before anything is sent when a key does not resolve.
    pub async fn insert(
        &mut self,
        executor: &dyn CommandExecutor,
        data: impl Into<InsertData>,
        return_entities: bool,
    ) -> Result<Inserted, BerryfiError> {
        let name = self.schema.name().to_string();
        let command = match data.into() {
            InsertData::One(record) => {
                Command::create_entity(&name, self.schema.outgoing(&record)?)
            }
            InsertData::Many(records) => Command::batch(
                records
                    .iter()
                    .map(|record| {
                        Ok(Command::create_entity(&name, self.schema.outgoing(record)?))
                    })
                    .collect::<Result<Vec<_>, BerryfiError>>()?,
            ),
        };

        let results = execute_checked(executor, &[command]).await?;

        let mut created = Vec::new();
        for result in &results {
            let records: Vec<&Value> = match result {
                Value::Array(items) => items.iter().collect(),
                single => vec![single],
            };
            for record in records {
                let Value::Object(map) = record else {
                    return Err(BerryfiError::UnexpectedResponse(format!(
                        "create of {name} returned a non-object record"
                    )));
                };
                let entity = Entity::from_remote(Arc::clone(&self.schema), map.clone());
                let id = entity.id().to_string();
                if return_entities {
                    created.push(entity.clone());
                }
                self.entities.set(id, entity);
            }
        }

        tracing::debug!(type_name = %name, count = self.entities.len(), "entities inserted");

        if return_entities {
            Ok(Inserted::Entities(created))
        } else {
            Ok(Inserted::Raw(results))
        }
    }
}

impl HasRecord for Type {
    fn record(&self) -> &Record {
        &self.record
    }
}

impl ToFibery for Type {
    fn to_fibery(&self) -> Result<Value, BerryfiError> {
        let fields = self
            .fields
            .values()
            .map(ToFibery::to_fibery)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            NAME_KEY: self.name(),
            FIELDS_KEY: fields,
            META_KEY: self.record.meta,
            ID_KEY: self.id(),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
