//! Core entity model and name resolution for the Glyph formula engine.
//!
//! This crate defines the sheet data model — characters with their
//! attribute, skill, and asset collections — and the [`TryResolve`]
//! capability through which the formula engine resolves `@`-references
//! against it. It knows nothing about formula text; tokenizing and
//! substitution live in `glyph-formula`.

/// Concrete sheet entity types (characters, skills, abilities).
pub mod character;
/// Entity identifiers, references, and property values.
pub mod entity;
/// Registry of character sheets.
pub mod folio;
/// The resolution capability trait and graph search helpers.
pub mod resolve;

/// Re-export sheet entity types.
pub use character::{Ability, Character, Rated, Skill};
/// Re-export identifier and value types.
pub use entity::{EntityId, EntityRef, Value};
/// Re-export the sheet registry.
pub use folio::Folio;
/// Re-export the resolution capability and search helpers.
pub use resolve::{
    EntityLookup, SEARCH_ROOT_WALK_LIMIT, TryResolve, find_search_root, lookup_path, resolve_name,
    search_collections,
};
