//! # berryfi-core
//!
//! The schema ingestion and entity field-resolution engine for Berryfi, a
//! Fibery workspace client - THE LOGIC.
//!
//! This crate mirrors a remote workspace schema (apps, types, fields) into
//! local objects and lets callers read and write entities through short,
//! human-friendly field names.
//!
//! ## Architectural Constraints
//!
//! - No network code: every remote call goes through [`CommandExecutor`]
//! - No process configuration: tokens and endpoints live in the app crate
//! - Structural errors always propagate; only soft lookups are swallowed
//! - A [`Workspace`] has one owner and is replaced wholesale on re-ingestion

// =============================================================================
// MODULES
// =============================================================================

pub mod app;
pub mod collection;
pub mod command;
pub mod entity;
pub mod export;
pub mod field;
pub mod ingestor;
pub mod meta;
pub mod primitives;
pub mod raw;
pub mod resolver;
pub mod timestamp;
pub mod type_def;
pub mod types;
pub mod workspace;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{BerryfiError, Flag, Flags, Kind, Origin};

// =============================================================================
// RE-EXPORTS: Schema Graph
// =============================================================================

pub use app::App;
pub use collection::Collection;
pub use entity::Entity;
pub use field::Field;
pub use meta::{HasFlags, HasMeta, HasRecord, Meta, Record};
pub use type_def::{InsertData, Inserted, SchemaNode, Type, TypeSchema};
pub use workspace::Workspace;

// =============================================================================
// RE-EXPORTS: Ingestion & Protocol
// =============================================================================

pub use command::{Command, CommandExecutor, CommandOutcome, execute_checked, execute_one};
pub use export::{ToFibery, clean_object};
pub use ingestor::{IngestReport, Ingestor};
pub use raw::{RawFieldRecord, RawName, RawTypeRecord, WorkspaceInfo};
pub use resolver::resolve;
pub use timestamp::{generate_entity_id, parse_timestamp, uuid_to_datetime};

/// Traits needed to use the schema graph.
pub mod prelude {
    pub use crate::command::CommandExecutor;
    pub use crate::export::ToFibery;
    pub use crate::meta::{HasFlags, HasMeta, HasRecord};
}
