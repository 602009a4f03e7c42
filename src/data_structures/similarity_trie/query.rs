// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Read-only traversal queries: ancestry, distances and similarity.

use std::collections::HashSet;

use super::{NodeId, SimilarityTrie, SimilarityTrieError, SimilarityTrieResult, Symbol};

impl SimilarityTrie {
    /// Nodes from `id` up to and including the root.
    pub fn parent_chain(&self, id: NodeId) -> SimilarityTrieResult<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            // A chain longer than the arena can only come from a cycle.
            if chain.len() > self.len() {
                return Err(SimilarityTrieError::Internal(format!(
                    "parent chain of {id} does not terminate"
                )));
            }
            chain.push(parent);
            current = self.node(parent)?;
        }
        Ok(chain)
    }

    /// Deepest node shared by the parent chains of `a` and `b`.
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The common ancestor (`a` itself when `a == b`).
    /// * `Err(SimilarityTrieError::NoCommonAncestor)` - Only if the trie is corrupted.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> SimilarityTrieResult<NodeId> {
        let ancestors_of_a: HashSet<NodeId> = self.parent_chain(a)?.into_iter().collect();
        self.parent_chain(b)?
            .into_iter()
            .find(|id| ancestors_of_a.contains(id))
            .ok_or(SimilarityTrieError::NoCommonAncestor(a, b))
    }

    /// Concatenated segments from the root down to `id`, root included.
    pub fn full_value(&self, id: NodeId) -> SimilarityTrieResult<Vec<Symbol>> {
        let chain = self.parent_chain(id)?;
        Ok(self.concat_segments(chain.iter().rev().copied()))
    }

    /// Segments accumulated below `ancestor` down to `id`.
    ///
    /// Returns the empty sequence when `id == ancestor`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Symbol>)` - The symbols `id` accumulates beyond `ancestor`.
    /// * `Err(SimilarityTrieError::NotAncestor)` - If `ancestor` is not on `id`'s chain.
    pub fn full_value_to(&self, id: NodeId, ancestor: NodeId) -> SimilarityTrieResult<Vec<Symbol>> {
        let below = self.chain_below(id, ancestor)?;
        Ok(self.concat_segments(below.into_iter().rev()))
    }

    /// Depth of `id` in edges; the root is at 0.
    pub fn distance(&self, id: NodeId) -> SimilarityTrieResult<usize> {
        Ok(self.parent_chain(id)?.len() - 1)
    }

    /// Number of edges between `id` and one of its ancestors.
    pub fn distance_to(&self, id: NodeId, ancestor: NodeId) -> SimilarityTrieResult<usize> {
        Ok(self.chain_below(id, ancestor)?.len())
    }

    /// Symbols the two keys accumulate after diverging from each other.
    ///
    /// Lower is more similar; identical keys score 0 and keys sharing only
    /// the root score the sum of their lengths below the root.
    pub fn similarity_score(&self, a: NodeId, b: NodeId) -> SimilarityTrieResult<usize> {
        let ancestor = self.common_ancestor(a, b)?;
        let own_a = self.full_value_to(a, ancestor)?.len();
        let own_b = self.full_value_to(b, ancestor)?.len();
        Ok(own_a + own_b)
    }

    /// Nodes in the subtree of `id` where some key ends: terminal nodes and
    /// childless nodes, depth first in symbol order.
    pub fn leaves(&self, id: NodeId) -> SimilarityTrieResult<Vec<NodeId>> {
        self.node(id)?;
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.index()];
            if node.is_terminal || node.is_leaf() {
                leaves.push(current);
            }
            stack.extend(node.children.values().rev().copied());
        }
        Ok(leaves)
    }

    /// The other children of `id`'s parent, in symbol order.
    pub fn siblings(&self, id: NodeId) -> SimilarityTrieResult<Vec<NodeId>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(Vec::new());
        };
        Ok(self
            .node(parent)?
            .children
            .values()
            .copied()
            .filter(|sibling| *sibling != id)
            .collect())
    }

    /// Display identifier for `id`: rendered segments from the root joined by `/`.
    ///
    /// Segments render at the trie's [`SymbolWidth`](super::SymbolWidth), so
    /// distinct paths in one trie never share an identifier.
    pub fn tree_path(&self, id: NodeId) -> SimilarityTrieResult<String> {
        let chain = self.parent_chain(id)?;
        let parts: Vec<String> = chain
            .iter()
            .rev()
            .map(|node| self.render(&self.nodes[node.index()].segment))
            .filter(|part| !part.is_empty())
            .collect();
        Ok(parts.join("/"))
    }

    /// Chain from `id` up to, but excluding, `ancestor`.
    fn chain_below(&self, id: NodeId, ancestor: NodeId) -> SimilarityTrieResult<Vec<NodeId>> {
        let chain = self.parent_chain(id)?;
        match chain.iter().position(|node| *node == ancestor) {
            Some(pos) => Ok(chain[..pos].to_vec()),
            None => Err(SimilarityTrieError::NotAncestor { node: id, ancestor }),
        }
    }

    fn concat_segments(&self, ids: impl Iterator<Item = NodeId>) -> Vec<Symbol> {
        let mut value = Vec::new();
        for id in ids {
            value.extend_from_slice(&self.nodes[id.index()].segment);
        }
        value
    }
}
