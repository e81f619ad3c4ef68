// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the conformance suite.

use composite_key::{CompositeKey, KeyPart, KeyTrie};

/// Builds a key over `parts` in `trie`.
///
/// Collecting through a slice keeps the call sites close to how embedders
/// write them: a literal list of parts.
pub fn key(trie: &KeyTrie, parts: &[KeyPart]) -> CompositeKey {
    CompositeKey::new(trie, parts.iter().cloned())
}
