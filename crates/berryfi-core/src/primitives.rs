//! # Schema Primitives
//!
//! Fixed names of the Fibery wire format. The remote schema is keyed by
//! namespaced strings; everything the engine reads or writes by name is
//! listed here.

/// Separator between namespace and short name: `App/Name`.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Namespace reserved for Fibery's own types and fields.
pub const SYSTEM_PREFIX: &str = "fibery/";

/// Label used when an object has no name.
pub const UNNAMED_LABEL: &str = "Unnamed";

// =============================================================================
// RECORD KEYS
// =============================================================================

pub const ID_KEY: &str = "fibery/id";
pub const NAME_KEY: &str = "fibery/name";
pub const META_KEY: &str = "fibery/meta";
pub const FIELDS_KEY: &str = "fibery/fields";
pub const TYPE_KEY: &str = "fibery/type";
pub const TYPES_KEY: &str = "fibery/types";
pub const VERSION_KEY: &str = "fibery/version";

// Entity keys with dedicated getters.
pub const RANK_KEY: &str = "fibery/rank";
pub const PUBLIC_ID_KEY: &str = "fibery/public-id";
pub const MODIFICATION_DATE_KEY: &str = "fibery/modification-date";

// =============================================================================
// METADATA KEYS
// =============================================================================

pub const META_PRIMITIVE: &str = "fibery/primitive?";
pub const META_DOMAIN: &str = "fibery/domain?";
pub const META_SECURED: &str = "fibery/secured?";
pub const META_READONLY: &str = "fibery/readonly?";
pub const META_REQUIRED: &str = "fibery/required?";
pub const META_ID: &str = "fibery/id?";
pub const META_PUBLIC_ID: &str = "fibery/public-id?";
pub const META_MODIFICATION_DATE: &str = "fibery/modification-date?";
pub const META_COLLECTION: &str = "fibery/collection?";
pub const META_RELATION: &str = "fibery/relation";
pub const META_DEFAULT_VALUE: &str = "fibery/default-value";
pub const META_UNIQUE: &str = "fibery/unique?";
pub const META_TITLE: &str = "ui/title?";
pub const META_OBJECT_EDITOR_ORDER: &str = "ui/object-editor-order";
pub const META_NUMBER_UNIT: &str = "ui/number-unit";
pub const META_PRECISION: &str = "ui/precision";
pub const META_COLOR: &str = "ui/color";
pub const META_MIXIN_ICON: &str = "ui/mixin-icon";
pub const META_SHOW_IN_MENU: &str = "ui/show-in-menu?";
pub const META_MIXINS: &str = "app/mixins";
pub const META_MIXIN: &str = "app/mixin?";
pub const META_MIXIN_CREATE_RELATION: &str = "app/mixin-create-relation?";

// Workspace identity, nested under `fibery/meta` of the schema result.
pub const META_REL_VERSION: &str = "fibery/rel-version";
pub const META_MAINTENANCE: &str = "fibery/maintenance?";

// =============================================================================
// COMMANDS
// =============================================================================

pub const CMD_SCHEMA_QUERY: &str = "fibery.schema/query";
pub const CMD_ENTITY_CREATE: &str = "fibery.entity/create";
pub const CMD_ENTITY_UPDATE: &str = "fibery.entity/update";
pub const CMD_ENTITY_QUERY: &str = "fibery.entity/query";
pub const CMD_BATCH: &str = "fibery.command/batch";

// =============================================================================
// HELPERS
// =============================================================================

/// The part of a namespaced name after its last separator.
///
/// `"Sales/Deal"` becomes `"Deal"`; a name without separator is returned whole.
#[must_use]
pub fn short_name(name: &str) -> &str {
    name.rsplit_once(NAMESPACE_SEPARATOR)
        .map_or(name, |(_, short)| short)
}

/// The namespace of a name: the text before its first separator.
#[must_use]
pub fn namespace(name: &str) -> &str {
    name.split_once(NAMESPACE_SEPARATOR)
        .map_or(name, |(ns, _)| ns)
}

/// `fibery/id` for `"fibery/id"` or any casing of `"id"`.
///
/// Every Fibery record carries an id, declared or not.
#[must_use]
pub fn resolve_id(name: &str) -> Option<&'static str> {
    (name == ID_KEY || name.eq_ignore_ascii_case("id")).then_some(ID_KEY)
}
