// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container and aggregate scenarios over the collections facade.

use std::rc::Rc;

use composite_collections::{KeyedMap, KeyedSet, Record, RecordError, RecordKey, Tuple};
use composite_key::{CanonicalKey, CompositeKey, Identity, KeyPart, KeyTrie};

#[derive(Debug, PartialEq, Eq, Hash)]
struct Point {
    x: i64,
    y: i64,
    z: i64,
}

fn xy_projection(trie: &Rc<KeyTrie>) -> impl Fn(&Point) -> CompositeKey + 'static {
    let trie = Rc::clone(trie);
    move |p: &Point| CompositeKey::new(&trie, [KeyPart::I64(p.x), KeyPart::I64(p.y)])
}

#[test]
fn map_lookup_through_a_projection() {
    // insert {x:0, y:0, z:1} -> "A", look up with {x:0, y:0, z:99}
    let trie = Rc::new(KeyTrie::new());
    let mut map = KeyedMap::keyed_by(xy_projection(&trie));

    map.insert(Point { x: 0, y: 0, z: 1 }, "A");
    assert_eq!(map.get(&Point { x: 0, y: 0, z: 99 }), Some(&"A"));
    assert_eq!(map.get(&Point { x: 0, y: 1, z: 1 }), None);
}

#[test]
fn map_iteration_yields_original_keys() {
    let trie = Rc::new(KeyTrie::new());
    let mut map = KeyedMap::keyed_by(xy_projection(&trie));
    map.insert(Point { x: 1, y: 2, z: 3 }, 7);

    let entries: Vec<(&Point, &i32)> = map.iter().collect();
    assert_eq!(entries, vec![(&Point { x: 1, y: 2, z: 3 }, &7)]);
}

#[test]
fn records_project_insertion_order_independently() {
    // r1 = {x: 1, y: 1}, r2 = {y: 1, x: 1}
    let r1 = Record::new([
        (RecordKey::from("x"), KeyPart::I64(1)),
        (RecordKey::from("y"), KeyPart::I64(1)),
    ])
    .unwrap();
    let r2 = Record::new([
        (RecordKey::from("y"), KeyPart::I64(1)),
        (RecordKey::from("x"), KeyPart::I64(1)),
    ])
    .unwrap();
    assert_eq!(r1.canonical_key(), r2.canonical_key());
}

#[test]
fn map_addresses_records_by_canonical_key() {
    let r1 = Record::new([
        (RecordKey::from("x"), KeyPart::I64(1)),
        (RecordKey::from("y"), KeyPart::I64(1)),
    ])
    .unwrap();
    let r2 = Record::new([
        (RecordKey::from("y"), KeyPart::I64(1)),
        (RecordKey::from("x"), KeyPart::I64(1)),
    ])
    .unwrap();

    let mut map = KeyedMap::by_canonical_key();
    map.insert(r1, 42);
    // Lookup returns the stored scalar.
    assert_eq!(map.get(&r2), Some(&42));
}

#[test]
fn identity_valued_records_discriminate() {
    let a = Identity::new();
    let b = Identity::new();
    let with = |id: &Identity| {
        Record::new([(RecordKey::from("owner"), KeyPart::from(id))]).unwrap()
    };

    let mut map = KeyedMap::by_canonical_key();
    map.insert(with(&a), 1);
    map.insert(with(&b), 2);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&with(&a)), Some(&1));
    assert_eq!(map.get(&with(&b)), Some(&2));
}

#[test]
fn set_deduplicates_tuples_by_canonical_key() {
    let mut set = KeyedSet::by_canonical_key();
    assert!(set.insert(Tuple::new([KeyPart::I64(1), KeyPart::from("a")])));
    assert!(!set.insert(Tuple::new([KeyPart::I64(1), KeyPart::from("a")])));
    assert!(set.insert(Tuple::new([KeyPart::from("a"), KeyPart::I64(1)])));
    assert_eq!(set.len(), 2);
}

#[test]
fn nested_aggregates_compose() {
    let inner = Tuple::new([KeyPart::I64(1), KeyPart::I64(2)]);
    let outer1 = Record::new([
        (RecordKey::from("pair"), KeyPart::from(&inner)),
        (RecordKey::from("tag"), KeyPart::from("t")),
    ])
    .unwrap();
    let outer2 = Record::new([
        (RecordKey::from("tag"), KeyPart::from("t")),
        (
            RecordKey::from("pair"),
            KeyPart::from(&Tuple::new([KeyPart::I64(1), KeyPart::I64(2)])),
        ),
    ])
    .unwrap();
    assert_eq!(outer1.canonical_key(), outer2.canonical_key());
}

#[test]
fn duplicate_record_fields_error() {
    let err = Record::new([
        (RecordKey::from("k"), KeyPart::I64(1)),
        (RecordKey::from("k"), KeyPart::I64(1)),
    ])
    .unwrap_err();
    assert!(matches!(err, RecordError::DuplicateKey { .. }));
    assert_eq!(err.to_string(), "duplicate record field key: k");
}

#[test]
fn projected_entries_pin_their_tokens() {
    let trie = Rc::new(KeyTrie::new());
    let baseline = trie.live_nodes();

    let mut map = KeyedMap::keyed_by(xy_projection(&trie));
    map.insert(Point { x: 3, y: 4, z: 0 }, "pinned");
    let with_entry = trie.live_nodes();
    assert!(with_entry > baseline, "the entry keeps its key's trie state");

    // Misses probe the trie transiently and leave no residue.
    assert_eq!(map.get(&Point { x: 9, y: 9, z: 9 }), None);
    assert_eq!(trie.live_nodes(), with_entry);

    // Removing the entry drops the pin and the branch unwinds.
    assert_eq!(map.remove(&Point { x: 3, y: 4, z: 7 }), Some("pinned"));
    assert_eq!(trie.live_nodes(), baseline);
}
