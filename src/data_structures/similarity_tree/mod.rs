// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Label-indexed similarity tree.
//!
//! Wraps a [`SimilarityTrie`] with an index from external labels (a source
//! URL or nickname) to the node holding that label's fingerprint, so callers
//! can ask ancestry questions by name.
//!
//! The tree is a plain single-owner value. Insertion takes `&mut self` and
//! may split nodes, so sharing one tree between threads means wrapping it in
//! a lock such as `parking_lot::RwLock`.

mod report;

use std::sync::Arc;

use fnv::FnvHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::data_structures::similarity_trie::{
    NodeId, SimilarityTrie, SimilarityTrieError, SimilarityTrieResult, Symbol, SymbolWidth,
};
use crate::lineage::LineageId;

pub use report::{PairScore, ReportLine};

/// Similarity trie plus a label index.
#[derive(Debug, Clone, Default)]
pub struct SimilarityTree {
    /// The authoritative structure
    trie: SimilarityTrie,

    /// Label to the node its fingerprint ends on
    labels: FnvHashMap<String, NodeId>,
}

impl SimilarityTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing trie with an empty label index.
    pub fn from_trie(trie: SimilarityTrie) -> Self {
        Self {
            trie,
            labels: FnvHashMap::default(),
        }
    }

    /// The underlying trie.
    pub fn trie(&self) -> &SimilarityTrie {
        &self.trie
    }

    /// Number of indexed labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no label has been added.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Indexed labels in sorted order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Inserts `key` and indexes it under `label`.
    ///
    /// When the insertion splits an existing node, labels that ended on that
    /// node are moved to the split-off tail, which now carries their key.
    /// Re-adding a label with a different key re-points it (last write wins).
    ///
    /// # Arguments
    ///
    /// * `label` - External name for the fingerprint.
    /// * `key` - The fingerprint symbols in trie order.
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The node now representing `label`.
    /// * `Err(SimilarityTrieError)` - If the trie rejected the key; the tree is unchanged.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        key: impl AsRef<[Symbol]>,
    ) -> SimilarityTrieResult<NodeId> {
        let label = label.into();
        let insertion = self.trie.add(key)?;

        if let Some(tail) = insertion.split_tail {
            let head = self.trie.node(tail)?.parent().ok_or_else(|| {
                SimilarityTrieError::Internal(format!("split tail {tail} has no parent"))
            })?;
            for node in self.labels.values_mut().filter(|node| **node == head) {
                *node = tail;
            }
        }

        if let Some(previous) = self.labels.insert(label.clone(), insertion.node) {
            if previous != insertion.node {
                debug!(%label, %previous, node = %insertion.node, "label re-pointed to new fingerprint");
            }
        }
        Ok(insertion.node)
    }

    /// Inserts a lineage id under `label`, keyed root commit first.
    ///
    /// Paths render at the lineage's symbol width from then on, so 8-bit
    /// fingerprints that happen to hold only small values still render with
    /// two digits per commit.
    pub fn add_lineage(&mut self, label: impl Into<String>, lineage: &LineageId) -> SimilarityTrieResult<NodeId> {
        let node = self.add(label, lineage.trie_key())?;
        self.trie
            .widen_symbols(SymbolWidth::for_prefix_length(lineage.prefix_length()));
        Ok(node)
    }

    /// The node indexed for `label`, if any.
    pub fn get(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// The node indexed for `label`.
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The node.
    /// * `Err(SimilarityTrieError::LabelNotFound)` - If the label was never added.
    pub fn node_for(&self, label: &str) -> SimilarityTrieResult<NodeId> {
        self.get(label)
            .ok_or_else(|| SimilarityTrieError::LabelNotFound(label.to_string()))
    }

    /// Similarity score between two labels; lower means more shared history.
    pub fn similarity_score(&self, a: &str, b: &str) -> SimilarityTrieResult<usize> {
        let a = self.node_for(a)?;
        let b = self.node_for(b)?;
        self.trie.similarity_score(a, b)
    }

    /// Deepest node shared by two labels.
    pub fn common_ancestor(&self, a: &str, b: &str) -> SimilarityTrieResult<NodeId> {
        let a = self.node_for(a)?;
        let b = self.node_for(b)?;
        self.trie.common_ancestor(a, b)
    }

    /// Display path of the node holding `label`.
    pub fn tree_path(&self, label: &str) -> SimilarityTrieResult<String> {
        self.trie.tree_path(self.node_for(label)?)
    }

    /// Labels whose fingerprint ends exactly on `node`, sorted.
    pub fn labels_at(&self, node: NodeId) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, id)| **id == node)
            .map(|(label, _)| label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Every label with its node, sorted by label.
    pub fn leaves(&self) -> Vec<(&str, NodeId)> {
        let mut leaves: Vec<(&str, NodeId)> = self
            .labels
            .iter()
            .map(|(label, node)| (label.as_str(), *node))
            .collect();
        leaves.sort_unstable();
        leaves
    }

    /// Other labels that share history with `label`, sorted.
    ///
    /// Two labels are family when their deepest shared node is below the
    /// root. The relation is symmetric; a label that only meets the rest of
    /// the tree at the root has no family.
    pub fn family(&self, label: &str) -> SimilarityTrieResult<Vec<&str>> {
        let node = self.node_for(label)?;
        let root = self.trie.root();

        let mut family = Vec::new();
        for (other, other_node) in &self.labels {
            if other == label {
                continue;
            }
            if self.trie.common_ancestor(node, *other_node)? != root {
                family.push(other.as_str());
            }
        }
        family.sort_unstable();
        Ok(family)
    }

    /// Indented dump of the trie with labels next to their nodes.
    pub fn render(&self) -> String {
        let mut labelled: FnvHashMap<NodeId, Vec<&str>> = FnvHashMap::default();
        for (label, node) in self.leaves() {
            labelled.entry(node).or_default().push(label);
        }

        let annotate = |id: NodeId| {
            labelled
                .get(&id)
                .map(|labels| format!("[{}]", labels.join(", ")))
        };
        self.trie.display().annotated(&annotate).to_string()
    }
}

/// A tree shared between threads; readers never overlap a writer.
pub type SharedSimilarityTree = Arc<RwLock<SimilarityTree>>;

impl From<SimilarityTree> for SharedSimilarityTree {
    fn from(tree: SimilarityTree) -> Self {
        Arc::new(RwLock::new(tree))
    }
}
