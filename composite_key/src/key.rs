// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-visible composite key handles.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::identity::IdentityCell;
use crate::part::KeyPart;
use crate::trie::KeyTrie;

/// A composite key: an ordered sequence of parts under structural equality.
///
/// Two keys compare equal iff they were built from equal part sequences in
/// the same trie and at least one handle from the earlier construction was
/// still alive when the later one ran. The handle itself is opaque: it
/// carries exactly one strong reference, to the interned identity token of
/// its sequence, and exposes nothing else.
///
/// Every construction returns a distinct handle; [`Clone`] copies a handle.
/// Equality goes through the token, never through handle identity.
///
/// `CompositeKey` deliberately implements neither `Hash` nor `Ord`.
/// Containers that need to index by key substitute [`CompositeKey::token_id`]
/// while holding the handle to pin the token.
#[derive(Clone)]
pub struct CompositeKey {
    token: Rc<IdentityCell>,
}

/// Opaque identifier of a live identity token.
///
/// Two `TokenId`s compare equal iff they came from equal live keys. Ids are
/// never reused, but a `TokenId` does not keep its token alive: holders must
/// also hold the [`CompositeKey`] it came from for the id to stay
/// meaningful.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TokenId(u64);

impl CompositeKey {
    /// Builds a key over `parts` in `trie`.
    #[must_use]
    pub fn new(trie: &KeyTrie, parts: impl IntoIterator<Item = KeyPart>) -> Self {
        let parts: Vec<KeyPart> = parts.into_iter().collect();
        Self {
            token: trie.intern(&parts),
        }
    }

    /// Builds a key over `parts` in this thread's default trie.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn of(parts: impl IntoIterator<Item = KeyPart>) -> Self {
        crate::trie::with_default_trie(|trie| Self::new(trie, parts))
    }

    /// The id of this key's identity token.
    #[inline]
    #[must_use]
    pub fn token_id(&self) -> TokenId {
        TokenId(self.token.id().as_u64())
    }

    #[inline]
    pub(crate) fn cell(&self) -> &Rc<IdentityCell> {
        &self.token
    }
}

impl PartialEq for CompositeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.token.id() == other.token.id()
    }
}

impl Eq for CompositeKey {}

impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompositeKey")
            .field(&self.token.id().as_u64())
            .finish()
    }
}

/// Protocol by which a value names its canonical key.
///
/// Structural containers use this to derive the key they actually index on:
/// a value that implements `CanonicalKey` is looked up by the composite key
/// it returns rather than by its own identity. A composite key returns
/// itself.
pub trait CanonicalKey {
    /// Returns the canonical composite key for this value.
    fn canonical_key(&self) -> CompositeKey;
}

impl CanonicalKey for CompositeKey {
    fn canonical_key(&self) -> CompositeKey {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::identity::Identity;

    #[test]
    fn back_to_back_constructions_compare_equal() {
        let trie = KeyTrie::new();
        let k1 = CompositeKey::new(&trie, [KeyPart::I64(0), KeyPart::I64(0)]);
        let k2 = CompositeKey::new(&trie, [KeyPart::I64(0), KeyPart::I64(0)]);
        let k3 = CompositeKey::new(&trie, [KeyPart::I64(0), KeyPart::I64(1)]);
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert_eq!(k1.token_id(), k2.token_id());
    }

    #[test]
    fn nested_keys_reduce_to_their_token() {
        let trie = KeyTrie::new();
        let inner1 = CompositeKey::new(&trie, [KeyPart::I64(1)]);
        let inner2 = CompositeKey::new(&trie, [KeyPart::I64(1)]);
        let outer1 = CompositeKey::new(&trie, [KeyPart::I64(2), KeyPart::from(&inner1)]);
        let outer2 = CompositeKey::new(&trie, [KeyPart::I64(2), KeyPart::from(&inner2)]);
        let outer3 = CompositeKey::new(&trie, [KeyPart::I64(2), KeyPart::I64(1)]);
        assert_eq!(outer1, outer2);
        assert_ne!(outer1, outer3, "a key part is not its flattened parts");
    }

    #[test]
    fn identity_is_stable_while_a_handle_lives() {
        let trie = KeyTrie::new();
        let obj = Identity::new();
        let held = CompositeKey::new(&trie, [KeyPart::from(&obj)]);
        for _ in 0..3 {
            let again = CompositeKey::new(&trie, [KeyPart::from(&obj)]);
            assert_eq!(held, again);
        }
    }

    #[test]
    fn canonical_key_of_a_key_is_itself() {
        let trie = KeyTrie::new();
        let k = CompositeKey::new(&trie, [KeyPart::Bool(true)]);
        assert_eq!(k.canonical_key(), k);
    }

    #[cfg(feature = "std")]
    #[test]
    fn default_trie_spans_constructions() {
        let k1 = CompositeKey::of([KeyPart::from("a"), KeyPart::U64(1)]);
        let k2 = CompositeKey::of([KeyPart::from("a"), KeyPart::U64(1)]);
        assert_eq!(k1, k2);
    }
}
