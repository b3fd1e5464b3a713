//! # Core Type Definitions
//!
//! This module contains the taxonomy and error types shared by every part of
//! the schema engine:
//! - Classification flags (`Flag`, `Flags`) and the derived `Kind`
//! - Origin of a raw schema record (`Origin`)
//! - Error types (`BerryfiError`)
//!
//! Every App, Type, Field and Entity carries a `Flags` value: exactly one
//! kind flag (app, type, field, entity) plus zero or more origin flags
//! (primitive, userCreated, auxiliaryType, auxiliaryField).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use thiserror::Error;

// =============================================================================
// FLAG
// =============================================================================

/// A single classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// A Fibery primitive, like `fibery/bool`, `fibery/email` or `fibery/date-range`.
    Primitive,
    /// Created by the workspace user. Can be an app, a type, a field or an entity.
    UserCreated,
    /// A Fibery helper type such as favourites, users or workflow states.
    AuxiliaryType,
    /// A field that is part of an auxiliary type.
    AuxiliaryField,
    /// A user-facing grouping of types.
    App,
    /// A schema-level definition, like a table.
    Type,
    /// A column-like definition belonging to a type.
    Field,
    /// A single record of a type.
    Entity,
}

impl Flag {
    /// Every flag, in bit order.
    pub const ALL: [Flag; 8] = [
        Flag::Primitive,
        Flag::UserCreated,
        Flag::AuxiliaryType,
        Flag::AuxiliaryField,
        Flag::App,
        Flag::Type,
        Flag::Field,
        Flag::Entity,
    ];

    /// The bit this flag occupies.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Flag::Primitive => 1 << 0,
            Flag::UserCreated => 1 << 1,
            Flag::AuxiliaryType => 1 << 2,
            Flag::AuxiliaryField => 1 << 3,
            Flag::App => 1 << 4,
            Flag::Type => 1 << 5,
            Flag::Field => 1 << 6,
            Flag::Entity => 1 << 7,
        }
    }

    /// Name used when rendering a flag set.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Flag::Primitive => "primitive",
            Flag::UserCreated => "userCreated",
            Flag::AuxiliaryType => "auxiliaryType",
            Flag::AuxiliaryField => "auxiliaryField",
            Flag::App => "app",
            Flag::Type => "type",
            Flag::Field => "field",
            Flag::Entity => "entity",
        }
    }
}

impl BitOr for Flag {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags {
        Flags::from(self).with(rhs)
    }
}

// =============================================================================
// FLAGS
// =============================================================================

/// A combination of classification flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Flags(u8);

impl Flags {
    /// No flags set.
    pub const EMPTY: Flags = Flags(0);

    /// Build a flag set from raw bits. Every bit pattern is valid.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return a copy with `flag` set.
    #[must_use]
    pub const fn with(self, flag: Flag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Set `flag` in place.
    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    /// Bitwise test for a single flag.
    #[must_use]
    pub const fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Check whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the set flags in bit order.
    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// The object kind, if exactly one kind flag is set.
    ///
    /// Returns `None` when no kind flag or more than one is present.
    #[must_use]
    pub fn kind(self) -> Option<Kind> {
        let mut kinds = Kind::ALL.into_iter().filter(|k| self.contains(k.flag()));
        match (kinds.next(), kinds.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags(flag.bit())
    }
}

impl BitOr<Flag> for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags {
        self.with(rhs)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Flag::name).collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

// =============================================================================
// KIND
// =============================================================================

/// The role an object plays in the schema graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    App,
    Type,
    Field,
    Entity,
}

impl Kind {
    /// Every kind.
    pub const ALL: [Kind; 4] = [Kind::App, Kind::Type, Kind::Field, Kind::Entity];

    /// The flag that marks this kind.
    #[must_use]
    pub const fn flag(self) -> Flag {
        match self {
            Kind::App => Flag::App,
            Kind::Type => Flag::Type,
            Kind::Field => Flag::Field,
            Kind::Entity => Flag::Entity,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::App => "App",
            Kind::Type => "Type",
            Kind::Field => "Field",
            Kind::Entity => "Entity",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// ORIGIN
// =============================================================================

/// Where a raw schema record comes from. Each record gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A Fibery primitive value type.
    Primitive,
    /// A domain type created by the user.
    UserCreated,
    /// Everything else: Fibery's own helper types.
    Auxiliary,
}

impl Origin {
    /// Flags given to the container object built from a record of this origin.
    #[must_use]
    pub fn container_flags(self) -> Flags {
        match self {
            Origin::Primitive => Flag::Primitive | Flag::Field,
            Origin::UserCreated => Flag::UserCreated | Flag::Type,
            Origin::Auxiliary => Flag::AuxiliaryType | Flag::Type,
        }
    }

    /// Flags given to the fields nested inside a record of this origin.
    #[must_use]
    pub fn nested_field_flags(self) -> Flags {
        match self {
            Origin::Primitive => Flag::Primitive | Flag::Field,
            Origin::UserCreated => Flag::UserCreated | Flag::Field,
            Origin::Auxiliary => Flag::AuxiliaryField | Flag::Field,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Primitive => "primitive",
            Origin::UserCreated => "user",
            Origin::Auxiliary => "auxiliary",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Berryfi client.
///
/// Structural errors (schema, field contract, batch) always propagate.
/// Soft misses such as reading an unknown field are not errors at all.
#[derive(Debug, Error)]
pub enum BerryfiError {
    /// The schema query returned no type list.
    #[error("No data received from Fibery")]
    MissingSchema,

    /// A raw schema record could not be understood.
    #[error("Malformed schema record: {0}")]
    MalformedRecord(String),

    /// Writing a field that the type does not declare.
    #[error("Invalid field '{field}' on {type_name}. Valid ones are {}", .valid.join(", "))]
    UnknownField {
        field: String,
        type_name: String,
        valid: Vec<String>,
    },

    /// Writing a field whose metadata marks it read-only.
    #[error("Field '{0}' is read-only")]
    ReadOnlyField(String),

    /// An entity key that no longer resolves against its type.
    #[error("Entity key '{key}' does not match any field of {type_name}")]
    FieldMismatch { key: String, type_name: String },

    /// Appending an object of the wrong kind.
    #[error("Invalid input; must be {expected}, got '{got}'")]
    InvalidMember { expected: String, got: String },

    /// Appending an object that already belongs to another owner.
    #[error("{object} already belongs to '{owner}'")]
    OwnerConflict { object: String, owner: String },

    /// Exporting an object that has no remote representation.
    #[error("{0} cannot be exported: apps are not stored in Fibery")]
    NotExportable(String),

    /// One or more commands in a batch failed.
    #[error("{}", .0.join("\n"))]
    Batch(Vec<String>),

    /// The remote answered with a shape the client cannot use.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// No type matches the given id or name.
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// A point query matched nothing.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// The command transport failed before any result came back.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON (de)serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// =============================================================================
// TESTS
// =============================================================================
