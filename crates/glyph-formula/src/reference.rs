//! Reference resolution over a text blob.
//!
//! [`ResolveScope`] ties a context entity to the graph it lives in,
//! finds the search root by walking owner back-references, and resolves
//! every `@`-token in a text into an ordered [`ResolutionMap`].

use std::collections::HashMap;

use glyph_core::{EntityLookup, TryResolve, Value, find_search_root, resolve_name};
use tracing::debug;

use crate::token::scan_references;

/// An insertion-ordered map from lowercased raw token to its resolved
/// value.
///
/// Keys are unique; the first insertion wins and later inserts of the
/// same key are ignored. Iteration order is first-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionMap {
    entries: Vec<(String, Option<Value>)>,
    index: HashMap<String, usize>,
}

impl ResolutionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key if it is not already present. Returns true if the
    /// entry was added.
    pub fn insert(&mut self, key: String, value: Option<Value>) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        true
    }

    /// Get the resolved value for a key. The outer `Option` is presence
    /// in the map; the inner is whether resolution succeeded.
    pub fn get(&self, key: &str) -> Option<&Option<Value>> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Returns true if the key has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Option<Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// A context entity paired with the graph used to follow its owner
/// chain.
#[derive(Clone, Copy)]
pub struct ResolveScope<'a> {
    context: &'a dyn TryResolve,
    graph: &'a dyn EntityLookup,
}

impl std::fmt::Debug for ResolveScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveScope")
            .field("context", &self.context.name())
            .finish_non_exhaustive()
    }
}

impl<'a> ResolveScope<'a> {
    /// Create a scope from a context entity and the graph it lives in.
    pub fn new(context: &'a dyn TryResolve, graph: &'a dyn EntityLookup) -> Self {
        Self { context, graph }
    }

    /// Create a scope for a top-level entity that is its own graph
    /// (e.g. a standalone character sheet).
    pub fn standalone<T>(entity: &'a T) -> Self
    where
        T: TryResolve + EntityLookup,
    {
        Self {
            context: entity,
            graph: entity,
        }
    }

    /// The entity resolution is performed against: the context's
    /// topmost owner within the walk limit.
    pub fn search_root(&self) -> &'a dyn TryResolve {
        find_search_root(self.context, self.graph)
    }

    /// Resolve every `@`-reference in `text` against the search root.
    ///
    /// The returned map holds one entry per distinct lowercased raw
    /// token, in first-encounter order. Lookup work runs at most once
    /// per distinct token; byte-identical repeats reuse the cached
    /// entry. Unresolvable tokens map to `None` and never abort the
    /// pass.
    pub fn resolve_references(&self, text: &str) -> ResolutionMap {
        let root = self.search_root();
        let mut map = ResolutionMap::new();
        for token in scan_references(text) {
            let key = token.dedup_key();
            if map.contains_key(&key) {
                continue;
            }
            let (canonical, property_path) = token.canonicalize();
            let value = resolve_name(root, &canonical, property_path);
            if value.is_none() {
                debug!(token = token.raw, "reference did not resolve");
            }
            map.insert(key, value);
        }
        map
    }
}
