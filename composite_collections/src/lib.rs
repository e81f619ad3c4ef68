// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural containers and frozen aggregates over `composite_key`.
//!
//! [`KeyedMap`] and [`KeyedSet`] compare their keys either natively or
//! through a caller-supplied projection to a
//! [`CompositeKey`](composite_key::CompositeKey): structurally equal keys
//! share one entry while iteration still yields the original key values.
//!
//! [`Record`] and [`Tuple`] are frozen aggregates that implement the
//! [`CanonicalKey`](composite_key::CanonicalKey) projection protocol, so
//! aggregates with equal contents address the same container entry:
//!
//! ```
//! use std::rc::Rc;
//!
//! use composite_collections::{KeyedMap, Record, RecordKey};
//! use composite_key::{KeyPart, KeyTrie};
//!
//! let r1 = Record::new([
//!     (RecordKey::from("x"), KeyPart::I64(1)),
//!     (RecordKey::from("y"), KeyPart::I64(1)),
//! ])?;
//! let r2 = Record::new([
//!     (RecordKey::from("y"), KeyPart::I64(1)),
//!     (RecordKey::from("x"), KeyPart::I64(1)),
//! ])?;
//!
//! let trie = Rc::new(KeyTrie::new());
//! let mut map = KeyedMap::keyed_by({
//!     let trie = Rc::clone(&trie);
//!     move |r: &Record| r.canonical_key_in(&trie)
//! });
//! map.insert(r1, 42);
//! assert_eq!(map.get(&r2), Some(&42));
//! # Ok::<(), composite_collections::RecordError>(())
//! ```
//!
//! The crate is `no_std + alloc`; the `std` feature enables the
//! `CanonicalKey` impls and [`KeyedMap::by_canonical_key`] /
//! [`KeyedSet::by_canonical_key`], which use the thread-local default trie.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod map;
mod record;
mod set;
mod tuple;

pub use map::{Iter as MapIter, KeyedMap};
pub use record::{Record, RecordError, RecordKey};
pub use set::{Iter as SetIter, KeyedSet};
pub use tuple::Tuple;
