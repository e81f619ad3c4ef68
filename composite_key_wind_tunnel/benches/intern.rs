// Copyright 2026 the Composite Key Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use composite_collections::KeyedMap;
use composite_key::{CompositeKey, Identity, KeyPart, KeyTrie};

/// Entry point for `composite_key` wind-tunnel benchmarks.
///
/// The scenarios separate the costs the engine is built around: cold
/// descent (allocating trie state), warm descent (re-interning into live
/// branches), the eternal vs. identity-bearing split, nesting, and the
/// reclamation churn of building and dropping keys.
fn bench_intern(c: &mut Criterion) {
    bench_eternal_cold(c);
    bench_eternal_warm(c);
    bench_identity_warm(c);
    bench_mixed_warm(c);
    bench_nested_depth(c);
    bench_churn(c);
    bench_projected_map_probe(c);
}

fn eternal_parts(len: usize) -> Vec<KeyPart> {
    (0..len)
        .map(|i| KeyPart::I64(i64::try_from(i).unwrap()))
        .collect()
}

fn identity_parts(objs: &[Identity]) -> Vec<KeyPart> {
    objs.iter().map(KeyPart::from).collect()
}

/// Cold construction of all-eternal keys: every iteration builds and drops
/// the key, so the branch is re-allocated each time.
fn bench_eternal_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("eternal_cold");
    for &len in &[2_usize, 8, 32] {
        let trie = KeyTrie::new();
        let parts = eternal_parts(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(CompositeKey::new(&trie, parts.iter().cloned())));
        });
    }
    group.finish();
}

/// Warm re-interning of all-eternal keys: a pinned handle keeps the branch
/// alive, so every iteration is a pure hit walk.
fn bench_eternal_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("eternal_warm");
    for &len in &[2_usize, 8, 32] {
        let trie = KeyTrie::new();
        let parts = eternal_parts(len);
        let pinned = CompositeKey::new(&trie, parts.iter().cloned());
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(CompositeKey::new(&trie, parts.iter().cloned())));
        });
        drop(pinned);
    }
    group.finish();
}

/// Warm re-interning across weakly-keyed edges only.
fn bench_identity_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity_warm");
    for &len in &[2_usize, 8, 32] {
        let trie = KeyTrie::new();
        let objs: Vec<Identity> = (0..len).map(|_| Identity::new()).collect();
        let parts = identity_parts(&objs);
        let pinned = CompositeKey::new(&trie, parts.iter().cloned());
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(CompositeKey::new(&trie, parts.iter().cloned())));
        });
        drop(pinned);
    }
    group.finish();
}

/// Warm re-interning of alternating categories, which pays for both descent
/// passes.
fn bench_mixed_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_warm");
    for &len in &[2_usize, 8, 32] {
        let trie = KeyTrie::new();
        let objs: Vec<Identity> = (0..len).map(|_| Identity::new()).collect();
        let parts: Vec<KeyPart> = (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    KeyPart::from(&objs[i])
                } else {
                    KeyPart::I64(i64::try_from(i).unwrap())
                }
            })
            .collect();
        let pinned = CompositeKey::new(&trie, parts.iter().cloned());
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(CompositeKey::new(&trie, parts.iter().cloned())));
        });
        drop(pinned);
    }
    group.finish();
}

/// Keys nested inside keys, one level per step.
fn bench_nested_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_depth");
    for &depth in &[1_usize, 4, 16] {
        let trie = KeyTrie::new();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let mut key = CompositeKey::new(&trie, [KeyPart::I64(0)]);
                for _ in 0..depth {
                    key = CompositeKey::new(&trie, [KeyPart::from(&key)]);
                }
                black_box(key)
            });
        });
    }
    group.finish();
}

/// Build-and-drop churn: every iteration allocates a fresh identity, builds
/// a key over it, and drops both, exercising the full reclamation walk.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let trie = KeyTrie::new();
    group.bench_function("identity_key_lifecycle", |b| {
        b.iter(|| {
            let obj = Identity::new();
            let key = CompositeKey::new(&trie, [KeyPart::from(&obj), KeyPart::I64(1)]);
            black_box(&key);
            drop(key);
            drop(obj);
        });
    });
    group.finish();
}

/// Projected-map lookups: every probe interns a transient key, hits the
/// entry by token, and lets the probe state unwind.
fn bench_projected_map_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("projected_map_probe");
    for &entries in &[16_usize, 256] {
        let trie = Rc::new(KeyTrie::new());
        let mut map = KeyedMap::keyed_by({
            let trie = Rc::clone(&trie);
            move |k: &(i64, i64)| {
                CompositeKey::new(&trie, [KeyPart::I64(k.0), KeyPart::I64(k.1)])
            }
        });
        for i in 0..entries {
            let i = i64::try_from(i).unwrap();
            map.insert((i, i), i);
        }
        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, _| {
            b.iter(|| black_box(map.get(&(7, 7)).copied()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intern);
criterion_main!(benches);
