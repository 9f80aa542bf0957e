//! Name resolution over the entity graph.
//!
//! Entities participate in symbolic reference resolution through the
//! [`TryResolve`] capability trait: each node exposes its display name,
//! an optional owner back-reference, and an optional hook for resolving
//! a comparable (lowercased, underscore-normalized) name against its
//! own sub-collections. Generic dotted-path property lookup is the
//! fallback when no capability answers.

use std::collections::HashMap;

use tracing::warn;

use crate::entity::{EntityId, Value};

/// How many owner levels to climb when locating the search root for a
/// reference (ability -> skill -> character).
pub const SEARCH_ROOT_WALK_LIMIT: usize = 2;

/// Capability trait for entities that can be targeted by `@`-references.
///
/// Every method except [`TryResolve::name`] has a default so plain
/// named nodes participate with no extra code.
pub trait TryResolve {
    /// The entity's display name, original casing.
    fn name(&self) -> &str;

    /// The owning entity's ID, if this node is embedded in another.
    fn owner(&self) -> Option<EntityId> {
        None
    }

    /// The value this entity resolves to when referenced by name alone.
    ///
    /// Leveled entities override this to return an [`EntityRef`]
    /// snapshot carrying their level; the default is the bare name.
    ///
    /// [`EntityRef`]: crate::entity::EntityRef
    fn reference_value(&self) -> Value {
        Value::String(self.name().to_string())
    }

    /// Resolve a comparable name (and optional property path) against
    /// this entity's own sub-collections.
    fn resolve_reference(
        &self,
        comparable_name: &str,
        property_path: Option<&str>,
    ) -> Option<Value> {
        let _ = (comparable_name, property_path);
        None
    }

    /// Enumerable properties for generic path lookup, if the entity
    /// exposes any.
    fn properties(&self) -> Option<&HashMap<String, Value>> {
        None
    }
}

/// Id-keyed access to the entity graph, used to follow owner
/// back-references without strong parent pointers.
pub trait EntityLookup {
    /// Look up an entity by ID anywhere in the graph.
    fn entity(&self, id: EntityId) -> Option<&dyn TryResolve>;
}

/// Walk owner back-references from `context` up to
/// [`SEARCH_ROOT_WALK_LIMIT`] levels to find the top-level entity that
/// references should be resolved against.
///
/// Nested entities (an ability of a skill of a character) must resolve
/// sibling references relative to the character, not themselves.
pub fn find_search_root<'a>(
    context: &'a dyn TryResolve,
    graph: &'a dyn EntityLookup,
) -> &'a dyn TryResolve {
    let mut current = context;
    for _ in 0..SEARCH_ROOT_WALK_LIMIT {
        match current.owner().and_then(|id| graph.entity(id)) {
            Some(owner) => current = owner,
            None => break,
        }
    }
    current
}

/// Resolve a single comparable name against one entity.
///
/// Resolution order: the entity's own name, then its
/// [`TryResolve::resolve_reference`] capability, then generic property
/// path lookup. A broken property path logs a warning and yields
/// `None`; it never fails the surrounding pass.
pub fn resolve_name(
    entity: &dyn TryResolve,
    comparable_name: &str,
    property_path: Option<&str>,
) -> Option<Value> {
    if entity.name().to_lowercase() == comparable_name {
        return match property_path {
            None => Some(entity.reference_value()),
            Some(path) => {
                let found = entity.properties().and_then(|props| lookup_path(props, path));
                if found.is_none() {
                    warn!(name = comparable_name, path, "property path did not resolve");
                }
                found
            }
        };
    }
    if let Some(value) = entity.resolve_reference(comparable_name, property_path) {
        return Some(value);
    }
    if let Some(path) = property_path {
        if let Some(value) = entity.properties().and_then(|props| lookup_path(props, path)) {
            return Some(value);
        }
        warn!(name = comparable_name, path, "property path did not resolve");
    }
    None
}

/// Scan an ordered set of candidate lists for the first entity that
/// resolves the given name.
///
/// The list order is a priority list: multiple entities may share a
/// lowercase name, and the first list supplied wins. Each candidate is
/// tried with the full single-name algorithm, including its own
/// capability-based resolution, so matches inside nested collections
/// (a skill's abilities) are found too.
pub fn search_collections(
    lists: &[&[&dyn TryResolve]],
    comparable_name: &str,
    property_path: Option<&str>,
) -> Option<Value> {
    lists
        .iter()
        .flat_map(|list| list.iter())
        .find_map(|entity| resolve_name(*entity, comparable_name, property_path))
}

/// Look up a dotted property path in a property map.
///
/// Paths are `.`-separated segment names, each optionally followed by
/// bracketed numeric indices (`weapons[0].damage`). Bracketed property
/// names are not supported. Any malformed segment or missing step
/// yields `None`.
pub fn lookup_path(properties: &HashMap<String, Value>, path: &str) -> Option<Value> {
    let mut current: Option<&Value> = None;
    for segment in path.split('.') {
        let (name, indices) = parse_segment(segment)?;
        let value = match current {
            None => properties.get(name)?,
            Some(Value::Map(map)) => map.get(name)?,
            Some(_) => return None,
        };
        let mut value = value;
        for index in indices {
            match value {
                Value::List(items) => value = items.get(index)?,
                _ => return None,
            }
        }
        current = Some(value);
    }
    current.cloned()
}

/// Split one path segment into its name and any trailing `[n]` indices.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let (name, rest) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };
    if name.is_empty() {
        return None;
    }
    let mut indices = Vec::new();
    let mut rest = rest;
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let end = inner.find(']')?;
        indices.push(inner[..end].parse::<usize>().ok()?);
        rest = &inner[end + 1..];
    }
    Some((name, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn lookup_simple_key() {
        let properties = props(&[("will", Value::Integer(4))]);
        assert_eq!(lookup_path(&properties, "will"), Some(Value::Integer(4)));
    }

    #[test]
    fn lookup_nested_map() {
        let inner = props(&[("value", Value::Integer(6))]);
        let properties = props(&[("forte", Value::Map(inner))]);
        assert_eq!(
            lookup_path(&properties, "forte.value"),
            Some(Value::Integer(6))
        );
    }

    #[test]
    fn lookup_list_index() {
        let properties = props(&[(
            "weapons",
            Value::List(vec![Value::from("sword"), Value::from("bow")]),
        )]);
        assert_eq!(
            lookup_path(&properties, "weapons[1]"),
            Some(Value::from("bow"))
        );
        assert_eq!(lookup_path(&properties, "weapons[2]"), None);
    }

    #[test]
    fn lookup_index_then_key() {
        let entry = props(&[("damage", Value::Integer(3))]);
        let properties = props(&[("weapons", Value::List(vec![Value::Map(entry)]))]);
        assert_eq!(
            lookup_path(&properties, "weapons[0].damage"),
            Some(Value::Integer(3))
        );
    }

    #[test]
    fn lookup_rejects_bracketed_names() {
        let properties = props(&[("weapons", Value::List(vec![Value::from("sword")]))]);
        assert_eq!(lookup_path(&properties, "weapons[sword]"), None);
    }

    #[test]
    fn lookup_rejects_malformed_segments() {
        let properties = props(&[("a", Value::Integer(1))]);
        assert_eq!(lookup_path(&properties, ""), None);
        assert_eq!(lookup_path(&properties, "a."), None);
        assert_eq!(lookup_path(&properties, "a[0"), None);
        assert_eq!(lookup_path(&properties, "[0]"), None);
    }

    #[test]
    fn lookup_missing_key_is_none() {
        let properties = props(&[("a", Value::Integer(1))]);
        assert_eq!(lookup_path(&properties, "b"), None);
        assert_eq!(lookup_path(&properties, "a.b"), None);
    }

    struct Plain {
        name: String,
    }

    impl TryResolve for Plain {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn resolve_name_matches_self() {
        let entity = Plain {
            name: "Gray Wolf".to_string(),
        };
        assert_eq!(
            resolve_name(&entity, "gray wolf", None),
            Some(Value::from("Gray Wolf"))
        );
        assert_eq!(resolve_name(&entity, "black wolf", None), None);
    }

    #[test]
    fn resolve_name_with_path_on_plain_entity_is_none() {
        let entity = Plain {
            name: "Gray Wolf".to_string(),
        };
        // No properties exposed, so the path cannot resolve.
        assert_eq!(resolve_name(&entity, "gray wolf", Some("level")), None);
    }

    #[test]
    fn search_collections_first_list_wins() {
        // Both entities share the lowercase name; the distinct casing
        // shows which one actually answered.
        let first = Plain {
            name: "Shadow".to_string(),
        };
        let second = Plain {
            name: "SHADOW".to_string(),
        };
        let list_a: Vec<&dyn TryResolve> = vec![&first];
        let list_b: Vec<&dyn TryResolve> = vec![&second];
        let found = search_collections(&[&list_a, &list_b], "shadow", None);
        assert_eq!(found, Some(Value::from("Shadow")));
    }

    #[test]
    fn search_collections_empty_lists() {
        assert_eq!(search_collections(&[], "shadow", None), None);
        let empty: Vec<&dyn TryResolve> = Vec::new();
        assert_eq!(search_collections(&[&empty], "shadow", None), None);
    }
}
