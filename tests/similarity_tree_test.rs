// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for the similarity tree.
//! Exercises the public API end to end: fingerprints from listings, the
//! labelled tree, the identity store, and shared read access across threads.

use std::sync::{Arc, Barrier};
use std::thread;

use codedna_lib::data_structures::{
    NodeId, SharedSimilarityTree, SimilarityTree, SimilarityTrie, SimilarityTrieError,
};
use codedna_lib::lineage::{parse_commit_list, LineageId};
use codedna_lib::store::{IdentityRecord, IdentityStore};

#[test]
fn test_scenario_root_segment_and_splits() {
    let mut trie = SimilarityTrie::with_root_segment(b"abcd".to_vec());
    let long = trie.add(b"abcdefghijkl").unwrap().node;
    let short = trie.add(b"abcdefgh").unwrap();

    assert_eq!(short.split_tail.map(|tail| trie.full_value(tail).unwrap()), Some(b"abcdefghijkl".to_vec()));
    assert_eq!(trie.full_value(long).unwrap(), b"abcdefgh".to_vec());
    assert_eq!(trie.find(b"abcdefghijkl").unwrap(), short.split_tail.unwrap());

    let err = trie.add(b"wxyz").unwrap_err();
    assert!(matches!(err, SimilarityTrieError::OutsideRoot { .. }));
}

#[test]
fn test_scenario_lineage_similarity() {
    let mut tree = SimilarityTree::new();
    tree.add_lineage("a", &LineageId::from_hex("9ee37c", 4).unwrap())
        .unwrap();
    tree.add_lineage("b", &LineageId::from_hex("1ee37c", 4).unwrap())
        .unwrap();
    tree.add_lineage("c", &LineageId::from_hex("9aaaaa", 4).unwrap())
        .unwrap();

    let ab = tree.similarity_score("a", "b").unwrap();
    let ac = tree.similarity_score("a", "c").unwrap();
    assert!(ab < ac, "shared history must score lower: {ab} vs {ac}");

    let ranked = tree.ranked_matches("a").unwrap();
    assert_eq!(ranked[0].b, "b");
}

#[test]
fn test_store_to_tree_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identities.json");

    let listings = [
        ("https://github.com/o/upstream", "aa00000000000000000000000000000000000000\nbb00000000000000000000000000000000000000\n"),
        ("https://github.com/o/fork", "cc00000000000000000000000000000000000000\naa00000000000000000000000000000000000000\nbb00000000000000000000000000000000000000\n"),
    ];

    let store = IdentityStore::open(&path).unwrap();
    for (source, text) in listings {
        let lineage = LineageId::from_hashes(&parse_commit_list(text).unwrap(), 4).unwrap();
        store.add(IdentityRecord::new(source, None, &lineage)).unwrap();
    }
    store.save().unwrap();

    let reopened = IdentityStore::open(&path).unwrap();
    let mut tree = SimilarityTree::new();
    for record in reopened.all() {
        tree.add_lineage(record.label(), &record.lineage().unwrap())
            .unwrap();
    }

    assert_eq!(
        tree.similarity_score("https://github.com/o/upstream", "https://github.com/o/fork")
            .unwrap(),
        1
    );
}

#[test]
fn test_concurrent_readers() {
    let mut tree = SimilarityTree::new();
    for i in 0..64u8 {
        let key: Vec<u8> = (0..16).map(|j| (i.wrapping_mul(7) ^ j) & 0xF).collect();
        tree.add(format!("repo-{i}"), key).unwrap();
    }
    let shared: SharedSimilarityTree = tree.into();
    let expected = shared.read().pairwise_scores().unwrap();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let guard = shared.read();
                guard.pairwise_scores().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_writer_excludes_readers() {
    let shared: SharedSimilarityTree = SimilarityTree::new().into();
    let writer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for i in 0..100u8 {
                shared
                    .write()
                    .add(format!("repo-{i}"), [i >> 4, i & 0xF, 1, 2])
                    .unwrap();
            }
        })
    };

    let reader = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for _ in 0..100 {
                let guard = shared.read();
                for (label, node) in guard.leaves() {
                    assert_eq!(guard.get(label), Some(node));
                    let _: NodeId = guard.node_for(label).unwrap();
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(shared.read().len(), 100);
}
