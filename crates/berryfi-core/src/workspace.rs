//! # Workspace
//!
//! The ingestion-session context: every App, Type and Field known to the
//! client, plus the workspace identity cached from the last schema query.
//!
//! A workspace has a single owner. Re-ingesting a fresh schema replaces it
//! wholesale.

use crate::app::App;
use crate::collection::Collection;
use crate::field::Field;
use crate::meta::{HasFlags, HasRecord};
use crate::raw::WorkspaceInfo;
use crate::type_def::Type;

/// Registries of apps (by name), types (by id) and fields (by id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub(crate) apps: Collection<String, App>,
    pub(crate) types: Collection<String, Type>,
    pub(crate) fields: Collection<String, Field>,
    info: Option<WorkspaceInfo>,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apps(&self) -> &Collection<String, App> {
        &self.apps
    }

    pub fn types(&self) -> &Collection<String, Type> {
        &self.types
    }

    pub fn fields(&self) -> &Collection<String, Field> {
        &self.fields
    }

    pub fn app(&self, name: &str) -> Option<&App> {
        self.apps.get(&name.to_string())
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.get(&id.to_string())
    }

    pub fn type_by_id(&self, id: &str) -> Option<&Type> {
        self.types.get(&id.to_string())
    }

    pub fn type_by_id_mut(&mut self, id: &str) -> Option<&mut Type> {
        self.types.get_mut(&id.to_string())
    }

    /// Find a type by its exact namespaced name.
    pub fn type_by_name(&self, name: &str) -> Option<&Type> {
        self.types.find(|ty, _, _| ty.name() == Some(name))
    }

    /// Find a type by id, exact name, case-insensitive name, or user type label.
    pub fn lookup_type(&self, query: &str) -> Option<&Type> {
        let id = self.locate_type(query)?;
        self.types.get(&id)
    }

    /// Mutable variant of [`Workspace::lookup_type`].
    pub fn lookup_type_mut(&mut self, query: &str) -> Option<&mut Type> {
        let id = self.locate_type(query)?;
        self.types.get_mut(&id)
    }

    fn locate_type(&self, query: &str) -> Option<String> {
        if self.types.has(&query.to_string()) {
            return Some(query.to_string());
        }
        let wanted = query.to_lowercase();
        self.types
            .find(|ty, _, _| ty.name() == Some(query))
            .or_else(|| {
                self.types.find(|ty, _, _| {
                    ty.name().is_some_and(|name| name.to_lowercase() == wanted)
                })
            })
            .or_else(|| {
                self.types
                    .find(|ty, _, _| ty.is_user_created() && ty.label().to_lowercase() == wanted)
            })
            .map(|ty| ty.id().to_string())
    }

    /// The types of app `name` keyed by id, in the order they were appended.
    pub fn app_types(&self, name: &str) -> Collection<String, &Type> {
        self.app(name)
            .map(|app| {
                app.type_ids()
                    .filter_map(|id| Some((id.to_string(), self.type_by_id(id)?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Workspace identity from the last schema query.
    pub fn info(&self) -> Option<&WorkspaceInfo> {
        self.info.as_ref()
    }

    pub fn set_info(&mut self, info: WorkspaceInfo) {
        self.info = Some(info);
    }
}
