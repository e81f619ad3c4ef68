// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frozen records with a canonical composite key.
//!
//! A [`Record`] is an immutable bag of `field -> value` pairs. Its canonical
//! key is built lazily on first access: a namespace marker, then the fields
//! flattened key-then-value in the record's stable field order. Two records
//! with equal contents therefore project to equal composite keys regardless
//! of the order their fields were supplied in.
//!
//! Field order is total: symbol keys sort before string keys; registered
//! symbols order by registry name, unregistered symbols by creation order.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use composite_key::{CompositeKey, KeyPart, KeyTrie, Symbol};

/// Namespace marker distinguishing record keys from every other sequence.
const RECORD_NAMESPACE: &str = "composite_collections.record";

fn record_marker() -> KeyPart {
    KeyPart::Symbol(Symbol::for_name(RECORD_NAMESPACE))
}

/// A record field key: a symbol or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Symbol-keyed field.
    Symbol(Symbol),
    /// String-keyed field.
    Str(Box<str>),
}

impl RecordKey {
    fn as_part(&self) -> KeyPart {
        match self {
            Self::Symbol(s) => KeyPart::Symbol(s.clone()),
            Self::Str(s) => KeyPart::Str(s.clone()),
        }
    }
}

/// Symbol keys sort before string keys.
impl Ord for RecordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Symbol(a), Self::Symbol(b)) => a.cmp(b),
            (Self::Symbol(_), Self::Str(_)) => Ordering::Less,
            (Self::Str(_), Self::Symbol(_)) => Ordering::Greater,
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "Symbol({})", s.description()),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for RecordKey {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for RecordKey {
    fn from(v: String) -> Self {
        Self::Str(v.into_boxed_str())
    }
}

impl From<Symbol> for RecordKey {
    fn from(v: Symbol) -> Self {
        Self::Symbol(v)
    }
}

/// Record construction errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// The same field key was supplied more than once.
    DuplicateKey {
        /// The offending key.
        key: RecordKey,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key } => write!(f, "duplicate record field key: {key}"),
        }
    }
}

impl core::error::Error for RecordError {}

/// A frozen `field -> value` aggregate.
///
/// Records are immutable after construction. Equality and hashing are
/// structural over the (sorted) fields, consistent with the canonical key:
/// `a == b` iff their canonical keys are equal in any one trie.
#[derive(Clone)]
pub struct Record {
    fields: Box<[(RecordKey, KeyPart)]>,
    key: OnceCell<CompositeKey>,
}

impl Record {
    /// Builds a record, sorting fields into the stable order.
    ///
    /// Rejects duplicate field keys rather than letting one silently win.
    pub fn new(
        fields: impl IntoIterator<Item = (RecordKey, KeyPart)>,
    ) -> Result<Self, RecordError> {
        let mut fields: Vec<(RecordKey, KeyPart)> = fields.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in fields.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(RecordError::DuplicateKey {
                    key: pair[0].0.clone(),
                });
            }
        }
        Ok(Self {
            fields: fields.into_boxed_slice(),
            key: OnceCell::new(),
        })
    }

    /// Returns the value of the field keyed by `key`.
    #[must_use]
    pub fn get(&self, key: &RecordKey) -> Option<&KeyPart> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the value of the string-keyed field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&KeyPart> {
        self.get(&RecordKey::Str(name.into()))
    }

    /// The number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in the stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &KeyPart)> {
        self.fields.iter().map(|(k, v)| (k, v))
    }

    /// Returns this record's canonical composite key, building it in `trie`
    /// on first access and serving the cached handle afterwards.
    ///
    /// The cache pins the key's identity token for the record's lifetime.
    /// Later calls reuse the first trie's key; a record is meant to live in
    /// one key universe.
    #[must_use]
    pub fn canonical_key_in(&self, trie: &KeyTrie) -> CompositeKey {
        self.key
            .get_or_init(|| CompositeKey::new(trie, self.flatten()))
            .clone()
    }

    fn flatten(&self) -> Vec<KeyPart> {
        let mut parts = Vec::with_capacity(1 + self.fields.len() * 2);
        parts.push(record_marker());
        for (k, v) in &self.fields {
            parts.push(k.as_part());
            parts.push(v.clone());
        }
        parts
    }
}

#[cfg(feature = "std")]
impl composite_key::CanonicalKey for Record {
    fn canonical_key(&self) -> CompositeKey {
        composite_key::with_default_trie(|trie| self.canonical_key_in(trie))
    }
}

/// A record part is its canonical key in the default trie.
#[cfg(feature = "std")]
impl From<&Record> for KeyPart {
    fn from(v: &Record) -> Self {
        use composite_key::CanonicalKey as _;
        Self::Key(v.canonical_key())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
