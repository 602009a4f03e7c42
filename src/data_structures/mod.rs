// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Data structures for CodeDNA.
//!
//! This module contains the structures used to compare repository
//! fingerprints:
//! - [`similarity_trie`]: an arena-backed compressed trie with ancestry queries
//! - [`similarity_tree`]: the trie plus a label index and reports

pub mod similarity_tree;
pub mod similarity_trie;

// Re-export common data structures
pub use similarity_tree::{PairScore, ReportLine, SharedSimilarityTree, SimilarityTree};
pub use similarity_trie::{
    Insertion, NodeId, SimilarityTrie, SimilarityTrieError, SimilarityTrieResult, SymbolWidth,
};
