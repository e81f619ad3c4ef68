// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A key-counting map with weakly-held keys.
//!
//! Keys are identity cells held through [`Weak`] references; values are held
//! strongly. [`CountingWeakMap::len`] reports the number of live entries.
//! When the last strong reference to an entry's key is dropped, the entry is
//! removed through the cell's watcher, and if the map transitioned from one
//! entry to none the `on_empty` callback fires — exactly once per such
//! transition.
//!
//! ## Policy and invariants
//!
//! - Removal is synchronous with key reclamation: there is no window in
//!   which `len` counts a dead key.
//! - [`CountingWeakMap::remove`] cancels the pending reclamation watcher for
//!   the removed entry; it never fires `on_empty`.
//! - Dropping the map unregisters every remaining watcher, so long-lived
//!   keys do not accumulate stale registrations.
//! - An entry's value is dropped with no internal borrow held, because the
//!   value may own an arbitrary subtree whose teardown re-enters other maps.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;

use crate::identity::{CellId, IdentityCell, ReclaimSink, WatchId};

struct Entry<V> {
    key: Weak<IdentityCell>,
    watch: WatchId,
    value: V,
}

/// Weak-keyed map with a live-entry count and an emptiness notification.
pub(crate) struct CountingWeakMap<V> {
    entries: RefCell<HashMap<CellId, Entry<V>>>,
    on_empty: Box<dyn Fn()>,
}

impl<V: Clone + 'static> CountingWeakMap<V> {
    /// Creates an empty map.
    ///
    /// `on_empty` runs whenever key reclamation removes the last live entry.
    pub(crate) fn new(on_empty: Box<dyn Fn()>) -> Rc<Self> {
        Rc::new(Self {
            entries: RefCell::new(HashMap::new()),
            on_empty,
        })
    }

    /// Inserts or updates the entry for `key`.
    ///
    /// A fresh key registers a reclamation watcher; re-inserting an existing
    /// key replaces the value and keeps the registration.
    pub(crate) fn insert(this: &Rc<Self>, key: &Rc<IdentityCell>, value: V) {
        let mut entries = this.entries.borrow_mut();
        if let Some(entry) = entries.get_mut(&key.id()) {
            entry.value = value;
            return;
        }
        let map_weak: Weak<Self> = Rc::downgrade(this);
        let sink: Weak<dyn ReclaimSink> = map_weak;
        let watch = key.watch(sink);
        entries.insert(
            key.id(),
            Entry {
                key: Rc::downgrade(key),
                watch,
                value,
            },
        );
    }

    /// Returns the value stored for `key`, if live.
    pub(crate) fn get(&self, key: CellId) -> Option<V> {
        self.entries.borrow().get(&key).map(|e| e.value.clone())
    }

    /// Removes the entry for `key`, cancelling its reclamation watcher.
    ///
    /// Returns `true` iff an entry was actually removed. Never fires
    /// `on_empty`.
    pub(crate) fn remove(&self, key: CellId) -> bool {
        let removed = self.entries.borrow_mut().remove(&key);
        match removed {
            Some(entry) => {
                if let Some(cell) = entry.key.upgrade() {
                    cell.unwatch(entry.watch);
                }
                true
            }
            None => false,
        }
    }

    /// The number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the live values.
    ///
    /// Taken eagerly so callers can walk values without holding a borrow on
    /// the map.
    pub(crate) fn values(&self) -> Vec<V> {
        self.entries
            .borrow()
            .values()
            .map(|e| e.value.clone())
            .collect()
    }

    fn reclaim(&self, key: CellId) {
        let removed = self.entries.borrow_mut().remove(&key);
        if removed.is_none() {
            return;
        }
        let now_empty = self.entries.borrow().is_empty();
        // The removed value may own a subtree; drop it before notifying.
        drop(removed);
        if now_empty {
            (self.on_empty)();
        }
    }
}

impl<V: Clone + 'static> ReclaimSink for CountingWeakMap<V> {
    fn reclaimed(self: Rc<Self>, cell: CellId) {
        self.reclaim(cell);
    }
}

impl<V> Drop for CountingWeakMap<V> {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().values() {
            if let Some(cell) = entry.key.upgrade() {
                cell.unwatch(entry.watch);
            }
        }
    }
}

impl<V> fmt::Debug for CountingWeakMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingWeakMap")
            .field("len", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}
