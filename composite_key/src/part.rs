// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input value model and its classification.
//!
//! A composite key is built from an ordered sequence of [`KeyPart`]s. Every
//! part falls into one of two categories ([`PartKind`]):
//!
//! - *identity-bearing*: parts with stable referential identity that can be
//!   held weakly — [`Identity`] objects, unregistered [`Symbol`]s, and
//!   nested [`CompositeKey`]s (which reduce to their identity token);
//! - *eternal*: parts whose equality is structural — scalars, strings,
//!   bytes, and registered symbols. These cannot be held weakly and are
//!   interned strongly on the eternal branch of the trie.
//!
//! Equality and hashing on `KeyPart` are structural and agree exactly with
//! key interning: two parts are equal iff a key built from one equals a key
//! built from the other in the same position. Floats use same-value-zero
//! semantics (one `NaN`, `+0` for both zeros), which is what makes `Eq`
//! lawful. Numeric variants do not cross-compare: `I64(1)` and `U64(1)` are
//! distinct parts.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::identity::{Identity, IdentityCell, Symbol, SymbolRepr};
use crate::key::CompositeKey;

/// One position of a composite key sequence.
#[derive(Clone, Debug)]
pub enum KeyPart {
    /// `()`.
    Unit,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit float, compared with same-value-zero semantics.
    F64(f64),
    /// UTF-8 string.
    Str(Box<str>),
    /// Byte string.
    Bytes(Box<[u8]>),
    /// Registered or unregistered symbol.
    Symbol(Symbol),
    /// A value with referential identity.
    Obj(Identity),
    /// A nested composite key, reduced to its identity token.
    Key(CompositeKey),
}

/// The two value categories the interning trie distinguishes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PartKind {
    /// Has stable referential identity; admissible as a weak-map key.
    IdentityBearing,
    /// Structurally equal to itself; interned strongly.
    Eternal,
}

impl KeyPart {
    /// Classifies this part.
    #[must_use]
    pub fn kind(&self) -> PartKind {
        match self {
            Self::Obj(_) | Self::Key(_) => PartKind::IdentityBearing,
            Self::Symbol(s) => {
                if s.is_registered() {
                    PartKind::Eternal
                } else {
                    PartKind::IdentityBearing
                }
            }
            Self::Unit
            | Self::Bool(_)
            | Self::I64(_)
            | Self::U64(_)
            | Self::F64(_)
            | Self::Str(_)
            | Self::Bytes(_) => PartKind::Eternal,
        }
    }
}

/// Canonical bits for a float edge: one `NaN`, and `+0` for both zeros.
pub(crate) fn canonical_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        0x7ff8_0000_0000_0000
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

/// Canonical edge label for an eternal part.
///
/// Stored strongly in eternal child maps; cheap to clone so descent can
/// reuse one canonicalized sequence across both passes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum EternalKey {
    Unit,
    Bool(bool),
    I64(i64),
    U64(u64),
    /// Canonical float bits (see [`canonical_f64_bits`]).
    F64(u64),
    Str(Box<str>),
    Bytes(Box<[u8]>),
    /// Registered symbol, by registry name.
    Symbol(Rc<str>),
    /// Second-pass stand-in for a position already consumed by the identity
    /// pass.
    Placeholder,
}

/// Canonical form of one part: the weakly-holdable cell for identity-bearing
/// parts, the structural edge label for eternal ones.
#[derive(Clone, Debug)]
pub(crate) enum Canonical {
    Cell(Rc<IdentityCell>),
    Eternal(EternalKey),
}

pub(crate) fn canonical(part: &KeyPart) -> Canonical {
    match part {
        KeyPart::Unit => Canonical::Eternal(EternalKey::Unit),
        KeyPart::Bool(v) => Canonical::Eternal(EternalKey::Bool(*v)),
        KeyPart::I64(v) => Canonical::Eternal(EternalKey::I64(*v)),
        KeyPart::U64(v) => Canonical::Eternal(EternalKey::U64(*v)),
        KeyPart::F64(v) => Canonical::Eternal(EternalKey::F64(canonical_f64_bits(*v))),
        KeyPart::Str(v) => Canonical::Eternal(EternalKey::Str(v.clone())),
        KeyPart::Bytes(v) => Canonical::Eternal(EternalKey::Bytes(v.clone())),
        KeyPart::Symbol(s) => match s.repr() {
            SymbolRepr::Registered(name) => Canonical::Eternal(EternalKey::Symbol(Rc::clone(name))),
            SymbolRepr::Unique { cell, .. } => Canonical::Cell(Rc::clone(cell)),
        },
        KeyPart::Obj(obj) => Canonical::Cell(Rc::clone(obj.cell())),
        KeyPart::Key(key) => Canonical::Cell(Rc::clone(key.cell())),
    }
}

impl PartialEq for KeyPart {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => canonical_f64_bits(*a) == canonical_f64_bits(*b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Obj(a), Self::Obj(b)) => a == b,
            (Self::Key(a), Self::Key(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for KeyPart {}

impl Hash for KeyPart {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Unit => {}
            Self::Bool(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::F64(v) => canonical_f64_bits(*v).hash(state),
            Self::Str(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::Symbol(v) => v.hash(state),
            Self::Obj(v) => v.hash(state),
            Self::Key(v) => v.token_id().hash(state),
        }
    }
}

impl From<()> for KeyPart {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for KeyPart {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for KeyPart {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u64> for KeyPart {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for KeyPart {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for KeyPart {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for KeyPart {
    fn from(v: String) -> Self {
        Self::Str(v.into_boxed_str())
    }
}

impl From<&[u8]> for KeyPart {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.into())
    }
}

impl From<Vec<u8>> for KeyPart {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v.into_boxed_slice())
    }
}

impl From<Symbol> for KeyPart {
    fn from(v: Symbol) -> Self {
        Self::Symbol(v)
    }
}

impl From<Identity> for KeyPart {
    fn from(v: Identity) -> Self {
        Self::Obj(v)
    }
}

impl From<&Identity> for KeyPart {
    fn from(v: &Identity) -> Self {
        Self::Obj(v.clone())
    }
}

impl From<CompositeKey> for KeyPart {
    fn from(v: CompositeKey) -> Self {
        Self::Key(v)
    }
}

impl From<&CompositeKey> for KeyPart {
    fn from(v: &CompositeKey) -> Self {
        Self::Key(v.clone())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn classification_matches_categories() {
        assert_eq!(KeyPart::Unit.kind(), PartKind::Eternal);
        assert_eq!(KeyPart::I64(3).kind(), PartKind::Eternal);
        assert_eq!(KeyPart::from("s").kind(), PartKind::Eternal);
        assert_eq!(
            KeyPart::Symbol(Symbol::for_name("k")).kind(),
            PartKind::Eternal
        );
        assert_eq!(
            KeyPart::Symbol(Symbol::new("k")).kind(),
            PartKind::IdentityBearing
        );
        assert_eq!(
            KeyPart::Obj(Identity::new()).kind(),
            PartKind::IdentityBearing
        );
    }

    #[test]
    fn float_edges_use_same_value_zero() {
        assert_eq!(KeyPart::F64(f64::NAN), KeyPart::F64(f64::NAN));
        assert_eq!(KeyPart::F64(0.0), KeyPart::F64(-0.0));
        assert_ne!(KeyPart::F64(1.0), KeyPart::F64(2.0));
        assert_eq!(canonical_f64_bits(0.0), canonical_f64_bits(-0.0));
        assert_eq!(
            canonical_f64_bits(f64::NAN),
            canonical_f64_bits(-f64::NAN),
            "all NaN payloads collapse to one edge"
        );
    }

    #[test]
    fn numeric_variants_do_not_cross_compare() {
        assert_ne!(KeyPart::I64(1), KeyPart::U64(1));
        assert_ne!(KeyPart::I64(1), KeyPart::F64(1.0));
    }

    #[test]
    fn identity_parts_compare_by_reference() {
        let a = Identity::new();
        assert_eq!(KeyPart::from(&a), KeyPart::from(&a));
        assert_ne!(KeyPart::from(&a), KeyPart::Obj(Identity::new()));
    }
}
