//! # App
//!
//! A user-facing grouping of Types. Apps exist only on the client: they are
//! derived from type namespaces and never stored in Fibery.

use crate::collection::Collection;
use crate::export::ToFibery;
use crate::meta::{HasFlags, HasRecord, Meta, Record};
use crate::type_def::Type;
use crate::types::{BerryfiError, Flag};
use serde_json::Value;

/// A namespace of user-created types. Its name doubles as its id.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    record: Record,
    types: Collection<String, String>,
}

impl App {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            record: Record::new(
                name,
                Some(name.to_string()),
                Meta::new(),
                Flag::UserCreated | Flag::App,
            ),
            types: Collection::new(),
        }
    }

    /// Names of the types in this app keyed by type id, in the order they
    /// were appended.
    pub fn types(&self) -> &Collection<String, String> {
        &self.types
    }

    /// Ids of the types in this app, in the order they were appended.
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn has_type(&self, type_id: &str) -> bool {
        self.types.has(&type_id.to_string())
    }

    /// Attach a user-created type to this app.
    ///
    /// The type's app is set once; appending it again is a no-op.
    ///
    /// # Errors
    /// `InvalidMember` for auxiliary types, `OwnerConflict` for a type that
    /// already belongs to another app.
    pub fn append(&mut self, ty: &mut Type) -> Result<(), BerryfiError> {
        if !ty.is_user_created() {
            return Err(BerryfiError::InvalidMember {
                expected: "user-created Type".to_string(),
                got: ty.flags().to_string(),
            });
        }
        if let Some(owner) = ty.app().filter(|owner| *owner != self.id()) {
            return Err(BerryfiError::OwnerConflict {
                object: format!("Type {}", ty.id()),
                owner: owner.to_string(),
            });
        }

        ty.set_app(self.id());
        let name = ty.name().unwrap_or(ty.id()).to_string();
        self.types.set(ty.id().to_string(), name);
        Ok(())
    }
}

impl HasRecord for App {
    fn record(&self) -> &Record {
        &self.record
    }
}

impl ToFibery for App {
    fn to_fibery(&self) -> Result<Value, BerryfiError> {
        Err(BerryfiError::NotExportable(format!("App {}", self.id())))
    }
}
