// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A set whose members may be compared structurally through a projection.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use composite_key::{CompositeKey, TokenId};
use hashbrown::hash_map;
use hashbrown::{HashMap, HashSet};

/// A set with an optional member projection.
///
/// The projected form follows the same contract as
/// [`KeyedMap`](crate::KeyedMap): membership is decided by the identity
/// token of the projected [`CompositeKey`], the first-inserted member value
/// is the one iteration yields, and each entry pins its projection's token
/// while it lives.
pub struct KeyedSet<T> {
    core: SetCore<T>,
}

enum SetCore<T> {
    Plain(HashSet<T>),
    Projected {
        project: Box<dyn Fn(&T) -> CompositeKey>,
        entries: HashMap<TokenId, (CompositeKey, T)>,
    },
}

impl<T: Eq + Hash> KeyedSet<T> {
    /// Creates a set that compares members by their own equality.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SetCore::Plain(HashSet::new()),
        }
    }

    /// Creates a set that compares members through `project`.
    #[must_use]
    pub fn keyed_by(project: impl Fn(&T) -> CompositeKey + 'static) -> Self {
        Self {
            core: SetCore::Projected {
                project: Box::new(project),
                entries: HashMap::new(),
            },
        }
    }

    /// Creates a set keyed by each member's own canonical key.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn by_canonical_key() -> Self
    where
        T: composite_key::CanonicalKey + 'static,
    {
        Self::keyed_by(|v: &T| v.canonical_key())
    }

    /// Inserts `value`. Returns `true` iff the set did not already contain
    /// an equal member.
    pub fn insert(&mut self, value: T) -> bool {
        match &mut self.core {
            SetCore::Plain(set) => set.insert(value),
            SetCore::Projected { project, entries } => {
                let handle = project(&value);
                match entries.entry(handle.token_id()) {
                    hash_map::Entry::Occupied(_) => false,
                    hash_map::Entry::Vacant(slot) => {
                        slot.insert((handle, value));
                        true
                    }
                }
            }
        }
    }

    /// Returns `true` if the set contains a member equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        match &self.core {
            SetCore::Plain(set) => set.contains(value),
            SetCore::Projected { project, entries } => {
                let probe = project(value);
                entries.contains_key(&probe.token_id())
            }
        }
    }

    /// Removes the member equal to `value`. Returns `true` iff one existed.
    pub fn remove(&mut self, value: &T) -> bool {
        match &mut self.core {
            SetCore::Plain(set) => set.remove(value),
            SetCore::Projected { project, entries } => {
                let probe = project(value);
                entries.remove(&probe.token_id()).is_some()
            }
        }
    }

    /// The number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.core {
            SetCore::Plain(set) => set.len(),
            SetCore::Projected { entries, .. } => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the members in arbitrary order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: match &self.core {
                SetCore::Plain(set) => IterInner::Plain(set.iter()),
                SetCore::Projected { entries, .. } => IterInner::Projected(entries.values()),
            },
        }
    }
}

impl<T: Eq + Hash> Default for KeyedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`KeyedSet`]'s members.
pub struct Iter<'a, T> {
    inner: IterInner<'a, T>,
}

enum IterInner<'a, T> {
    Plain(hashbrown::hash_set::Iter<'a, T>),
    Projected(hash_map::Values<'a, TokenId, (CompositeKey, T)>),
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Plain(it) => it.next(),
            IterInner::Projected(it) => it.next().map(|(_, v)| v),
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

impl<T: fmt::Debug + Eq + Hash> fmt::Debug for KeyedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
