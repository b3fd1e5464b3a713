//! # Field-Name Resolver
//!
//! Maps a user-friendly field name to the namespaced name Fibery expects.
//!
//! Resolution order:
//! 1. Exact match against the known field names.
//! 2. Case-insensitive match of the given name against the short part of
//!    every known name (`"user email"` finds `"MyApp/User email"`).
//! 3. Nothing.

use crate::primitives::short_name;

/// Resolve `name` against a set of fully namespaced field names.
pub fn resolve<'a, S: AsRef<str>>(field_names: &'a [S], name: &str) -> Option<&'a str> {
    let known = || field_names.iter().map(AsRef::<str>::as_ref);

    if let Some(exact) = known().find(|full| *full == name) {
        return Some(exact);
    }

    let wanted = name.to_lowercase();
    known().find(|full| short_name(full).to_lowercase() == wanted)
}
