// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trie nodes and the reclamation walk.
//!
//! A node is one position in the interning trie. Nodes come in two kinds,
//! tagged by their child storage:
//!
//! - a *GC node* keys its children on identity cells, held weakly through a
//!   [`CountingWeakMap`], plus one strong transition slot into the eternal
//!   sub-trie;
//! - an *eternal node* keys its children on canonical [`EternalKey`] labels,
//!   held strongly.
//!
//! Every node may lazily mint one identity token, held weakly; the only
//! strong references to a token are the user-visible key handles. A node
//! knows its parent and the edge label the parent reached it by, which is
//! what makes upward purging possible.
//!
//! ## Policy and invariants
//!
//! - A node is owned by exactly one parent child-map entry (the root by the
//!   trie). There are no other strong references to nodes at rest.
//! - A node may be purged only when its child maps are empty *and* its
//!   token, if ever minted, is dead. [`Node::examine`] checks both and walks
//!   toward the root; the walk stops at the first node that still carries
//!   weight.
//! - Reclamation has two triggers: a token dying (the terminal's watcher
//!   fires) and a weakly-held child edge dying (the counting map empties and
//!   its `on_empty` fires). Both funnel into `examine`.
//! - `examine` and `purge` take the node through an owned `Rc` so the node
//!   cannot be deallocated under a live `&self` while its parent entry is
//!   removed.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use hashbrown::HashMap;

use crate::identity::{CellId, IdentityCell, ReclaimSink, WatchId};
use crate::part::EternalKey;
use crate::weak_map::CountingWeakMap;

/// The edge by which a parent reaches a child.
#[derive(Clone, Debug)]
pub(crate) enum EdgeLabel {
    /// The trie root; never used as a child edge.
    Root,
    /// Weak edge keyed on an identity cell.
    Identity(CellId),
    /// The strong edge from a GC node into the eternal sub-trie.
    Transition,
    /// Strong edge keyed on a canonical eternal label.
    Eternal(EternalKey),
}

/// Child storage, tagging the node kind.
#[derive(Debug)]
pub(crate) enum Children {
    Gc {
        map: Rc<CountingWeakMap<Rc<Node>>>,
        transition: RefCell<Option<Rc<Node>>>,
    },
    Eternal {
        map: RefCell<HashMap<EternalKey, Rc<Node>>>,
    },
}

/// One position in the interning trie.
#[derive(Debug)]
pub(crate) struct Node {
    parent: Weak<Node>,
    edge: EdgeLabel,
    token: RefCell<Weak<IdentityCell>>,
    token_watch: Cell<Option<WatchId>>,
    children: Children,
}

impl Node {
    /// Creates a GC node.
    ///
    /// The child map's emptiness notification re-examines this node, which
    /// is how a dying weakly-held edge can unwind an otherwise idle branch.
    pub(crate) fn new_gc(parent: Weak<Self>, edge: EdgeLabel) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let weak = this.clone();
            Self {
                parent,
                edge,
                token: RefCell::new(Weak::new()),
                token_watch: Cell::new(None),
                children: Children::Gc {
                    map: CountingWeakMap::new(Box::new(move || {
                        if let Some(node) = weak.upgrade() {
                            Self::examine(&node);
                        }
                    })),
                    transition: RefCell::new(None),
                },
            }
        })
    }

    /// Creates an eternal node.
    pub(crate) fn new_eternal(parent: Weak<Self>, edge: EdgeLabel) -> Rc<Self> {
        Rc::new(Self {
            parent,
            edge,
            token: RefCell::new(Weak::new()),
            token_watch: Cell::new(None),
            children: Children::Eternal {
                map: RefCell::new(HashMap::new()),
            },
        })
    }

    /// Takes or creates the weakly-keyed child for `cell`.
    pub(crate) fn gc_child(this: &Rc<Self>, cell: &Rc<IdentityCell>) -> Rc<Self> {
        let Children::Gc { map, .. } = &this.children else {
            unreachable!("identity edge descended on an eternal node");
        };
        if let Some(child) = map.get(cell.id()) {
            return child;
        }
        let child = Self::new_gc(Rc::downgrade(this), EdgeLabel::Identity(cell.id()));
        CountingWeakMap::insert(map, cell, Rc::clone(&child));
        child
    }

    /// Takes or creates the transition child into the eternal sub-trie.
    pub(crate) fn transition_child(this: &Rc<Self>) -> Rc<Self> {
        let Children::Gc { transition, .. } = &this.children else {
            unreachable!("transition edge descended on an eternal node");
        };
        let mut slot = transition.borrow_mut();
        if let Some(child) = slot.as_ref() {
            return Rc::clone(child);
        }
        let child = Self::new_eternal(Rc::downgrade(this), EdgeLabel::Transition);
        *slot = Some(Rc::clone(&child));
        child
    }

    /// Takes or creates the strongly-keyed child for `key`.
    pub(crate) fn eternal_child(this: &Rc<Self>, key: EternalKey) -> Rc<Self> {
        let Children::Eternal { map } = &this.children else {
            unreachable!("eternal edge descended on a GC node");
        };
        if let Some(child) = map.borrow().get(&key) {
            return Rc::clone(child);
        }
        let child = Self::new_eternal(Rc::downgrade(this), EdgeLabel::Eternal(key.clone()));
        map.borrow_mut().insert(key, Rc::clone(&child));
        child
    }

    /// Returns this node's identity token, minting one if the previous token
    /// (if any) is dead.
    ///
    /// The token is held weakly here; the caller's handle is what keeps it
    /// alive. A freshly minted token is watched so its death re-examines
    /// this node.
    pub(crate) fn token(this: &Rc<Self>) -> Rc<IdentityCell> {
        if let Some(token) = this.token.borrow().upgrade() {
            return token;
        }
        let token = IdentityCell::fresh();
        let node_weak: Weak<Self> = Rc::downgrade(this);
        let sink: Weak<dyn ReclaimSink> = node_weak;
        let watch = token.watch(sink);
        *this.token.borrow_mut() = Rc::downgrade(&token);
        this.token_watch.set(Some(watch));
        token
    }

    /// Decides whether this node still carries weight, and if not, purges it
    /// and re-examines the parent.
    pub(crate) fn examine(this: &Rc<Self>) {
        if !this.children_empty() {
            return;
        }
        if this.token.borrow().upgrade().is_some() {
            return;
        }
        let Some(parent) = this.parent.upgrade() else {
            // The root is never purged.
            return;
        };
        parent.purge(&this.edge);
        Self::examine(&parent);
    }

    /// Removes the child reached by `edge` from this node's child storage.
    fn purge(&self, edge: &EdgeLabel) {
        match (&self.children, edge) {
            (Children::Gc { map, .. }, EdgeLabel::Identity(id)) => {
                map.remove(*id);
            }
            (Children::Gc { transition, .. }, EdgeLabel::Transition) => {
                let removed = transition.borrow_mut().take();
                drop(removed);
            }
            (Children::Eternal { map }, EdgeLabel::Eternal(key)) => {
                let removed = map.borrow_mut().remove(key);
                drop(removed);
            }
            _ => {
                debug_assert!(false, "edge label does not match parent child storage");
            }
        }
    }

    fn children_empty(&self) -> bool {
        match &self.children {
            Children::Gc { map, transition } => map.is_empty() && transition.borrow().is_none(),
            Children::Eternal { map } => map.borrow().is_empty(),
        }
    }

    /// Counts this node and every descendant.
    pub(crate) fn live_count(this: &Rc<Self>) -> usize {
        let mut count = 1;
        match &this.children {
            Children::Gc { map, transition } => {
                for child in map.values() {
                    count += Self::live_count(&child);
                }
                if let Some(child) = transition.borrow().as_ref() {
                    count += Self::live_count(child);
                }
            }
            Children::Eternal { map } => {
                for child in map.borrow().values() {
                    count += Self::live_count(child);
                }
            }
        }
        count
    }
}

impl ReclaimSink for Node {
    fn reclaimed(self: Rc<Self>, _cell: CellId) {
        // The terminal's token died; this branch may now be able to unwind.
        Self::examine(&self);
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // A node can be dropped while its token is still pinned by handles
        // (its own weakly-held edge died upstream). Detach the watcher so
        // the eventual token death does not chase a dead branch.
        if let Some(watch) = self.token_watch.get() {
            if let Some(token) = self.token.get_mut().upgrade() {
                token.unwatch(watch);
            }
        }
    }
}
