// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interning trie and its descent.
//!
//! A [`KeyTrie`] is a rooted tree of nodes in which the path from the root
//! to a node spells a prefix of a canonicalized part sequence. Interning a
//! sequence descends the trie in two passes:
//!
//! 1. The *identity pass* walks the GC branch consuming only the
//!    identity-bearing parts, in position order, over weakly-keyed edges.
//!    Eternal parts are skipped (and remembered).
//! 2. If any eternal part was seen, the descent crosses the transition edge
//!    into the eternal sub-trie and replays the whole sequence from the
//!    start: eternal parts descend on their canonical labels, and each
//!    position already consumed by the identity pass descends on a
//!    placeholder label.
//!
//! The replay preserves both length and position, so `[a, 1, b]` and
//! `[a, b, 1]` reach different terminals even though they contain the same
//! parts, and no sequence terminates at a node that is a proper prefix of
//! another sequence's terminal.
//!
//! The split exists so that exactly the edges keyed on reclaimable values
//! are the weak ones: when an identity-bearing part dies, the whole branch
//! hanging off its edge is released, and when a terminal's token dies, the
//! branch unwinds upward as far as it carries no other weight.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use crate::identity::IdentityCell;
use crate::node::{EdgeLabel, Node};
use crate::part::{Canonical, EternalKey, KeyPart, canonical};

/// An interning trie: one universe of composite keys.
///
/// Keys interned in the same trie and built from equal part sequences share
/// one identity token for as long as any handle to it is alive. Keys from
/// different tries never compare equal.
///
/// With the `std` feature, [`with_default_trie`] provides a thread-local
/// trie so callers that want a single ambient key universe do not have to
/// thread one through.
#[derive(Debug)]
pub struct KeyTrie {
    root: Rc<Node>,
}

impl KeyTrie {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new_gc(Weak::new(), EdgeLabel::Root),
        }
    }

    /// Interns `parts` and returns the terminal's identity token.
    pub(crate) fn intern(&self, parts: &[KeyPart]) -> Rc<IdentityCell> {
        let canon: Vec<Canonical> = parts.iter().map(canonical).collect();

        let mut current = Rc::clone(&self.root);
        let mut seen_eternal = false;
        for c in &canon {
            match c {
                Canonical::Cell(cell) => current = Node::gc_child(&current, cell),
                Canonical::Eternal(_) => seen_eternal = true,
            }
        }

        if seen_eternal {
            current = Node::transition_child(&current);
            for c in canon {
                let label = match c {
                    Canonical::Eternal(key) => key,
                    Canonical::Cell(_) => EternalKey::Placeholder,
                };
                current = Node::eternal_child(&current, label);
            }
        }

        Node::token(&current)
    }

    /// The number of live trie nodes, including the root.
    ///
    /// Diagnostic: after every handle and every identity-bearing part of a
    /// key is dropped, the count returns to what it was before the key was
    /// interned.
    #[must_use]
    pub fn live_nodes(&self) -> usize {
        Node::live_count(&self.root)
    }
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static DEFAULT_TRIE: KeyTrie = KeyTrie::new();
}

/// Runs `f` with this thread's default trie.
///
/// The trie is created on first use and lives until thread exit. Handles
/// and identity values may safely outlive it: equality keeps working, and
/// their late drops find nothing left to unwind.
#[cfg(feature = "std")]
pub fn with_default_trie<R>(f: impl FnOnce(&KeyTrie) -> R) -> R {
    DEFAULT_TRIE.with(|trie| f(trie))
}
