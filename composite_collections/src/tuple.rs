// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frozen tuples with a canonical composite key.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;
use core::hash::{Hash, Hasher};

use composite_key::{CompositeKey, KeyPart, KeyTrie, Symbol};

/// Namespace marker distinguishing tuple keys from every other sequence.
const TUPLE_NAMESPACE: &str = "composite_collections.tuple";

fn tuple_marker() -> KeyPart {
    KeyPart::Symbol(Symbol::for_name(TUPLE_NAMESPACE))
}

/// A frozen positional aggregate.
///
/// Like [`Record`](crate::Record) but positional: the canonical key is the
/// namespace marker followed by the items in order, so equal item sequences
/// project to equal keys and a tuple never collides with a record of the
/// same values.
#[derive(Clone)]
pub struct Tuple {
    items: Box<[KeyPart]>,
    key: OnceCell<CompositeKey>,
}

impl Tuple {
    /// Builds a tuple over `items`.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = KeyPart>) -> Self {
        Self {
            items: items.into_iter().collect(),
            key: OnceCell::new(),
        }
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&KeyPart> {
        self.items.get(index)
    }

    /// The number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyPart> {
        self.items.iter()
    }

    /// Returns this tuple's canonical composite key, building it in `trie`
    /// on first access and serving the cached handle afterwards.
    #[must_use]
    pub fn canonical_key_in(&self, trie: &KeyTrie) -> CompositeKey {
        self.key
            .get_or_init(|| {
                let mut parts = Vec::with_capacity(1 + self.items.len());
                parts.push(tuple_marker());
                parts.extend(self.items.iter().cloned());
                CompositeKey::new(trie, parts)
            })
            .clone()
    }
}

#[cfg(feature = "std")]
impl composite_key::CanonicalKey for Tuple {
    fn canonical_key(&self) -> CompositeKey {
        composite_key::with_default_trie(|trie| self.canonical_key_in(trie))
    }
}

/// A tuple part is its canonical key in the default trie.
#[cfg(feature = "std")]
impl From<&Tuple> for KeyPart {
    fn from(v: &Tuple) -> Self {
        use composite_key::CanonicalKey as _;
        Self::Key(v.canonical_key())
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
