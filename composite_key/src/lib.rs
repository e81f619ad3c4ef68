// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural equality over composite keys.
//!
//! A [`CompositeKey`] is built from an ordered sequence of [`KeyPart`]s.
//! Keys built from equal sequences compare equal even though each
//! construction returns a distinct handle, because equal sequences intern to
//! the same identity token. Equality is referential on the token, which
//! makes it transitive through nesting: a key may itself be a part of
//! another key.
//!
//! The interning state is self-reclaiming. Parts with referential identity
//! ([`Identity`], unregistered [`Symbol`]s, nested keys) are held weakly by
//! the trie, and a key's token is pinned only by its handles. Dropping every
//! handle for a key, or any identity-bearing part of its sequence, releases
//! the trie nodes allocated for it. [`KeyTrie::live_nodes`] observes this.
//!
//! ```
//! use composite_key::{CompositeKey, Identity, KeyPart, KeyTrie};
//!
//! let trie = KeyTrie::new();
//! let user = Identity::new();
//!
//! let a = CompositeKey::new(&trie, [KeyPart::from(&user), KeyPart::I64(7)]);
//! let b = CompositeKey::new(&trie, [KeyPart::from(&user), KeyPart::I64(7)]);
//! let c = CompositeKey::new(&trie, [KeyPart::I64(7), KeyPart::from(&user)]);
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c); // position matters
//! ```
//!
//! The crate is `no_std + alloc`. The `std` feature adds a thread-local
//! default trie ([`with_default_trie`], [`CompositeKey::of`]).

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod identity;
mod key;
mod node;
mod part;
mod trie;
mod weak_map;

pub use identity::{Identity, Symbol};
pub use key::{CanonicalKey, CompositeKey, TokenId};
pub use part::{KeyPart, PartKind};
#[cfg(feature = "std")]
pub use trie::with_default_trie;
pub use trie::KeyTrie;
