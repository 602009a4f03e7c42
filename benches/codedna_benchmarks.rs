// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! CodeDNA Benchmarks
//!
//! Benchmarks for trie insertion, lookup and similarity scoring, implemented
//! with the Criterion framework.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use std::time::Duration;

use codedna_lib::bench::fork_families;
use codedna_lib::data_structures::{SimilarityTree, SimilarityTrie};

/// Benchmark building a trie from fork families of growing size
fn bench_trie_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_trie_insert");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    for families in [10, 100, 1000] {
        let keys = fork_families(families, 4, 200, 50, 42);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("fork_families", families), &keys, |b, keys| {
            b.iter(|| {
                let mut trie = SimilarityTrie::new();
                for key in keys {
                    trie.add(black_box(key)).unwrap();
                }
                trie
            });
        });
    }

    group.finish();
}

/// Benchmark exact lookups against a populated trie
fn bench_trie_find(c: &mut Criterion) {
    let keys = fork_families(500, 4, 200, 50, 7);
    let mut trie = SimilarityTrie::new();
    for key in &keys {
        trie.add(key).unwrap();
    }

    c.bench_function("similarity_trie_find", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(trie.find(black_box(key)).unwrap());
            }
        });
    });
}

/// Benchmark label-level scoring and the full report
fn bench_tree_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_tree");
    let keys = fork_families(50, 4, 200, 50, 99);

    let mut tree = SimilarityTree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.add(format!("repo-{i}"), key).unwrap();
    }

    group.bench_function("pairwise_scores", |b| {
        b.iter(|| black_box(tree.pairwise_scores().unwrap()));
    });

    group.bench_function("report", |b| {
        b.iter(|| black_box(tree.report().unwrap()));
    });

    group.bench_function("build_labelled", |b| {
        b.iter_batched(
            || keys.clone(),
            |keys| {
                let mut tree = SimilarityTree::new();
                for (i, key) in keys.iter().enumerate() {
                    tree.add(format!("repo-{i}"), key).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_trie_insert, bench_trie_find, bench_tree_queries);
criterion_main!(benches);
