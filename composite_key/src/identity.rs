// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity cells: unique-by-allocation values and their reclamation watchers.
//!
//! Everything in this crate that has referential identity — user-created
//! [`Identity`] objects, unregistered [`Symbol`]s, and the tokens minted at
//! trie terminals — is backed by an `IdentityCell`. A cell is compared by
//! allocation, may be held weakly, and notifies its registered watchers
//! exactly once when the last strong reference to it is dropped.
//!
//! ## Policy and invariants
//!
//! - Cell ids come from a process-wide counter and are never reused, so a
//!   reclaimed cell cannot alias a live one.
//! - A watcher holds a [`Weak`] reference to its sink; registration extends
//!   the lifetime of neither side.
//! - Notification is synchronous: it runs inside the `Drop` of the last
//!   strong reference, on the dropping thread. Sinks must therefore be
//!   reentrancy-safe with respect to the structures they mutate.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::cmp::Ordering as CmpOrdering;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identifier of an identity cell, unique per allocation for the life of the
/// process.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct CellId(u64);

impl CellId {
    /// Returns the raw integer backing this id.
    #[inline]
    pub(crate) const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Cancellation handle for one watcher registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct WatchId(u64);

/// Receiver of cell reclamation events.
pub(crate) trait ReclaimSink {
    /// Called when a watched cell loses its last strong reference.
    ///
    /// Runs inside the cell's `Drop`; upgrading a `Weak` to the dying cell
    /// fails by the time this is invoked.
    fn reclaimed(self: Rc<Self>, cell: CellId);
}

#[derive(Debug)]
struct Watcher {
    watch: WatchId,
    sink: Weak<dyn ReclaimSink>,
}

/// A unique-by-allocation cell with reclamation watchers.
///
/// The cell itself carries no user-observable state; its id exists so weak
/// maps can index entries without keeping the cell alive.
#[derive(Debug)]
pub(crate) struct IdentityCell {
    id: CellId,
    watchers: RefCell<Vec<Watcher>>,
}

impl IdentityCell {
    pub(crate) fn fresh() -> Rc<Self> {
        Rc::new(Self {
            id: CellId(next_id()),
            watchers: RefCell::new(Vec::new()),
        })
    }

    #[inline]
    pub(crate) fn id(&self) -> CellId {
        self.id
    }

    /// Registers `sink` to be notified when this cell is reclaimed.
    pub(crate) fn watch(&self, sink: Weak<dyn ReclaimSink>) -> WatchId {
        let watch = WatchId(next_id());
        self.watchers.borrow_mut().push(Watcher { watch, sink });
        watch
    }

    /// Cancels a registration.
    ///
    /// Unknown ids are ignored: the watcher may already have fired and
    /// drained itself.
    pub(crate) fn unwatch(&self, watch: WatchId) {
        self.watchers.borrow_mut().retain(|w| w.watch != watch);
    }
}

impl Drop for IdentityCell {
    fn drop(&mut self) {
        let watchers = core::mem::take(self.watchers.get_mut());
        for w in watchers {
            if let Some(sink) = w.sink.upgrade() {
                sink.reclaimed(self.id);
            }
        }
    }
}

/// A value with stable referential identity.
///
/// Two `Identity` values compare equal iff one is a clone of the other;
/// [`Identity::new`] always produces a value distinct from every existing
/// one. Used as the identity-bearing leaf of composite keys: the interning
/// trie holds it weakly, so dropping every clone releases the trie state
/// keyed on it.
#[derive(Clone, Debug)]
pub struct Identity {
    cell: Rc<IdentityCell>,
}

impl Identity {
    /// Creates a fresh identity, distinct from every other.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: IdentityCell::fresh(),
        }
    }

    #[inline]
    pub(crate) fn cell(&self) -> &Rc<IdentityCell> {
        &self.cell
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Identity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cell.id() == other.cell.id()
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.id().hash(state);
    }
}

/// An interned or unique marker value.
///
/// Registered symbols ([`Symbol::for_name`]) compare structurally by their
/// registry name: every call with the same name yields an equal symbol.
/// Unregistered symbols ([`Symbol::new`]) have referential identity like
/// [`Identity`] and carry a description that plays no part in equality.
#[derive(Clone, Debug)]
pub struct Symbol {
    repr: SymbolRepr,
}

#[derive(Clone, Debug)]
pub(crate) enum SymbolRepr {
    Registered(Rc<str>),
    Unique {
        description: Rc<str>,
        cell: Rc<IdentityCell>,
    },
}

impl Symbol {
    /// Creates an unregistered symbol, distinct from every other.
    #[must_use]
    pub fn new(description: impl Into<Rc<str>>) -> Self {
        Self {
            repr: SymbolRepr::Unique {
                description: description.into(),
                cell: IdentityCell::fresh(),
            },
        }
    }

    /// Returns the registered symbol for `name`.
    #[must_use]
    pub fn for_name(name: impl Into<Rc<str>>) -> Self {
        Self {
            repr: SymbolRepr::Registered(name.into()),
        }
    }

    /// Returns the registry name, or `None` for unregistered symbols.
    #[must_use]
    pub fn registry_name(&self) -> Option<&str> {
        match &self.repr {
            SymbolRepr::Registered(name) => Some(name),
            SymbolRepr::Unique { .. } => None,
        }
    }

    /// Returns the description. For registered symbols this is the registry
    /// name.
    #[must_use]
    pub fn description(&self) -> &str {
        match &self.repr {
            SymbolRepr::Registered(name) => name,
            SymbolRepr::Unique { description, .. } => description,
        }
    }

    /// Returns `true` for symbols produced by [`Symbol::for_name`].
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self.repr, SymbolRepr::Registered(_))
    }

    pub(crate) fn repr(&self) -> &SymbolRepr {
        &self.repr
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (SymbolRepr::Registered(a), SymbolRepr::Registered(b)) => a == b,
            (SymbolRepr::Unique { cell: a, .. }, SymbolRepr::Unique { cell: b, .. }) => {
                a.id() == b.id()
            }
            _ => false,
        }
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.repr {
            SymbolRepr::Registered(name) => {
                0_u8.hash(state);
                name.hash(state);
            }
            SymbolRepr::Unique { cell, .. } => {
                1_u8.hash(state);
                cell.id().hash(state);
            }
        }
    }
}

/// Symbols have a stable total order within a process: registered symbols
/// first, ordered by registry name, then unregistered symbols in creation
/// order. Used by record field ordering.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        match (&self.repr, &other.repr) {
            (SymbolRepr::Registered(a), SymbolRepr::Registered(b)) => a.cmp(b),
            (SymbolRepr::Registered(_), SymbolRepr::Unique { .. }) => CmpOrdering::Less,
            (SymbolRepr::Unique { .. }, SymbolRepr::Registered(_)) => CmpOrdering::Greater,
            (SymbolRepr::Unique { cell: a, .. }, SymbolRepr::Unique { cell: b, .. }) => {
                a.id().cmp(&b.id())
            }
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}
