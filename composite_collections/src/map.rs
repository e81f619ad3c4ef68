// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A map whose keys may be compared structurally through a projection.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use composite_key::{CompositeKey, TokenId};
use hashbrown::HashMap;
use hashbrown::hash_map;

/// A map with an optional key projection.
///
/// Without a projection ([`KeyedMap::new`]) keys are compared by their own
/// `Eq`/`Hash`, like an ordinary hash map. With one ([`KeyedMap::keyed_by`])
/// every operation first projects the key to a [`CompositeKey`] and indexes
/// on that key's identity token, so distinct key values that project
/// structurally equal address the same entry.
///
/// ## Semantics
///
/// - The map stores the *original* key of the first insertion for an entry;
///   re-inserting through an equal projection replaces the value and keeps
///   the stored key. Iteration yields original keys, never tokens.
/// - Each projected entry holds its projection result, which pins the
///   identity token for as long as the entry lives. Lookups that miss
///   build a transient key whose interning state is reclaimed when the
///   probe handle drops.
/// - The projection must be pure: projecting the same key value twice must
///   yield equal composite keys, or entries become unreachable.
pub struct KeyedMap<K, V> {
    core: MapCore<K, V>,
}

struct ProjectedEntry<K, V> {
    #[allow(dead_code, reason = "pins the projected key's identity token while the entry lives")]
    handle: CompositeKey,
    key: K,
    value: V,
}

enum MapCore<K, V> {
    Plain(HashMap<K, V>),
    Projected {
        project: Box<dyn Fn(&K) -> CompositeKey>,
        entries: HashMap<TokenId, ProjectedEntry<K, V>>,
    },
}

impl<K: Eq + Hash, V> KeyedMap<K, V> {
    /// Creates a map that compares keys by their own equality.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: MapCore::Plain(HashMap::new()),
        }
    }

    /// Creates a map that compares keys through `project`.
    #[must_use]
    pub fn keyed_by(project: impl Fn(&K) -> CompositeKey + 'static) -> Self {
        Self {
            core: MapCore::Projected {
                project: Box::new(project),
                entries: HashMap::new(),
            },
        }
    }

    /// Creates a map keyed by each key's own canonical key.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn by_canonical_key() -> Self
    where
        K: composite_key::CanonicalKey + 'static,
    {
        Self::keyed_by(|k: &K| k.canonical_key())
    }

    /// Inserts `value` under `key`, returning the displaced value if the
    /// entry existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.core {
            MapCore::Plain(map) => map.insert(key, value),
            MapCore::Projected { project, entries } => {
                let handle = project(&key);
                match entries.entry(handle.token_id()) {
                    hash_map::Entry::Occupied(mut slot) => {
                        Some(core::mem::replace(&mut slot.get_mut().value, value))
                    }
                    hash_map::Entry::Vacant(slot) => {
                        slot.insert(ProjectedEntry { handle, key, value });
                        None
                    }
                }
            }
        }
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        match &self.core {
            MapCore::Plain(map) => map.get(key),
            MapCore::Projected { project, entries } => {
                let probe = project(key);
                entries.get(&probe.token_id()).map(|e| &e.value)
            }
        }
    }

    /// Returns a mutable reference to the value stored under `key`, if any.
    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match &mut self.core {
            MapCore::Plain(map) => map.get_mut(key),
            MapCore::Projected { project, entries } => {
                let probe = project(key);
                entries.get_mut(&probe.token_id()).map(|e| &mut e.value)
            }
        }
    }

    /// Returns `true` if an entry exists under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry under `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.core {
            MapCore::Plain(map) => map.remove(key),
            MapCore::Projected { project, entries } => {
                let probe = project(key);
                entries.remove(&probe.token_id()).map(|e| e.value)
            }
        }
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.core {
            MapCore::Plain(map) => map.len(),
            MapCore::Projected { entries, .. } => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(original key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: match &self.core {
                MapCore::Plain(map) => IterInner::Plain(map.iter()),
                MapCore::Projected { entries, .. } => IterInner::Projected(entries.values()),
            },
        }
    }
}

impl<K: Eq + Hash, V> Default for KeyedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`KeyedMap`]'s entries.
pub struct Iter<'a, K, V> {
    inner: IterInner<'a, K, V>,
}

enum IterInner<'a, K, V> {
    Plain(hash_map::Iter<'a, K, V>),
    Projected(hash_map::Values<'a, TokenId, ProjectedEntry<K, V>>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Plain(it) => it.next(),
            IterInner::Projected(it) => it.next().map(|e| (&e.key, &e.value)),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyedMap<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> fmt::Debug for ProjectedEntry<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectedEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use composite_key::{CompositeKey, KeyPart, KeyTrie};
    use std::rc::Rc;
    use std::string::{String, ToString};

    #[derive(Debug, PartialEq, Eq, Hash)]
    struct Point {
        x: i64,
        y: i64,
        z: i64,
    }

    #[test]
    fn plain_mode_uses_key_equality() {
        let mut map = KeyedMap::new();
        map.insert("a", 1);
        assert_eq!(map.get(&"a"), Some(&1));
        assert_eq!(map.get(&"b"), None);
    }

    #[test]
    fn projection_collapses_structurally_equal_keys() {
        let trie = Rc::new(KeyTrie::new());
        let by_xy = {
            let trie = Rc::clone(&trie);
            move |p: &Point| {
                CompositeKey::new(&trie, [KeyPart::I64(p.x), KeyPart::I64(p.y)])
            }
        };
        let mut map = KeyedMap::keyed_by(by_xy);

        map.insert(Point { x: 0, y: 0, z: 1 }, "A".to_string());
        assert_eq!(
            map.get(&Point { x: 0, y: 0, z: 99 }).map(String::as_str),
            Some("A"),
            "z is not part of the projection"
        );
        assert_eq!(map.get(&Point { x: 0, y: 1, z: 1 }), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn reinsert_keeps_the_original_key() {
        let trie = Rc::new(KeyTrie::new());
        let by_xy = {
            let trie = Rc::clone(&trie);
            move |p: &Point| {
                CompositeKey::new(&trie, [KeyPart::I64(p.x), KeyPart::I64(p.y)])
            }
        };
        let mut map = KeyedMap::keyed_by(by_xy);

        map.insert(Point { x: 1, y: 2, z: 3 }, 10);
        let displaced = map.insert(Point { x: 1, y: 2, z: 4 }, 20);
        assert_eq!(displaced, Some(10));
        assert_eq!(map.len(), 1);

        let (stored, value) = map.iter().next().unwrap();
        assert_eq!(stored.z, 3, "first insertion's key is the stored one");
        assert_eq!(*value, 20);
    }

    #[test]
    fn remove_through_an_equal_projection() {
        let trie = Rc::new(KeyTrie::new());
        let by_x = {
            let trie = Rc::clone(&trie);
            move |p: &Point| CompositeKey::new(&trie, [KeyPart::I64(p.x)])
        };
        let mut map = KeyedMap::keyed_by(by_x);
        map.insert(Point { x: 5, y: 0, z: 0 }, ());
        assert!(map.remove(&Point { x: 5, y: 9, z: 9 }).is_some());
        assert!(map.is_empty());
    }
}
