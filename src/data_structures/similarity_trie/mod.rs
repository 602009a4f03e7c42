// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Similarity Trie Implementation
//!
//! A compressed (radix) trie over fixed-alphabet symbol strings. Each node
//! stores only the remainder of its key segment, each edge is labelled by the
//! first symbol of the child's segment, and shared prefixes are factored out
//! automatically as keys are inserted.
//!
//! Nodes are kept in a single arena owned by the trie and linked by
//! [`NodeId`] indices, so parent back-links never own anything. The trie is
//! append-only: nodes are created by [`SimilarityTrie::add`] and never removed.
//!
//! # Example
//!
//! ```
//! use codedna_lib::data_structures::similarity_trie::SimilarityTrie;
//!
//! let mut trie = SimilarityTrie::new();
//! let a = trie.add(b"abcdefgh").unwrap().node;
//! let b = trie.add(b"abcdfghi").unwrap().node;
//!
//! assert_eq!(trie.full_value(a).unwrap(), b"abcdefgh".to_vec());
//! assert_eq!(trie.similarity_score(a, b).unwrap(), 8);
//! ```

mod error;
mod node;
mod query;
mod render;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, MissReason, SimilarityTrieError, SimilarityTrieResult};
pub use node::{render_symbols, NodeId, Symbol, SymbolWidth, TrieNode};
pub use render::{Annotate, TrieDisplay};

/// Outcome of inserting one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// Node that now represents the inserted key
    pub node: NodeId,

    /// Tail created when an existing node had to be split, if any
    pub split_tail: Option<NodeId>,

    /// `false` when the key was already present
    pub created: bool,
}

/// Compressed trie used to compare lineage fingerprints.
///
/// Key features:
/// * Incremental insertion with automatic common-prefix factoring
/// * In-place node splitting that keeps node ids stable
/// * Ancestor, distance and similarity queries over node ids
#[derive(Debug, Clone)]
pub struct SimilarityTrie {
    /// Node arena; index 0 is the root
    nodes: Vec<TrieNode>,

    /// Width every segment renders at; only ever widens
    symbol_width: SymbolWidth,
}

impl SimilarityTrie {
    /// Creates an empty trie whose root holds the empty segment.
    pub fn new() -> Self {
        Self::with_root_segment(Vec::new())
    }

    /// Creates a trie whose root already holds `segment`.
    ///
    /// Every key later inserted must begin with this segment.
    ///
    /// # Arguments
    ///
    /// * `segment` - The symbols stored on the root node.
    pub fn with_root_segment(segment: impl Into<Vec<Symbol>>) -> Self {
        let segment = segment.into();
        Self {
            symbol_width: SymbolWidth::of(&segment),
            nodes: vec![TrieNode::new(segment, None)],
        }
    }

    /// Width used when rendering segments and paths.
    pub fn symbol_width(&self) -> SymbolWidth {
        self.symbol_width
    }

    /// Renders every symbol at least at `width` from now on.
    ///
    /// Keys drawn from wide commit prefixes can still hold only small
    /// values, so callers that know the alphabet set it up front.
    pub fn widen_symbols(&mut self, width: SymbolWidth) {
        self.symbol_width = self.symbol_width.max(width);
    }

    /// Renders `symbols` at this trie's width.
    pub fn render(&self, symbols: &[Symbol]) -> String {
        render_symbols(symbols, self.symbol_width.max(SymbolWidth::of(symbols)))
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing but the bare root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && !self.nodes[0].is_terminal
    }

    /// Number of distinct keys stored.
    pub fn key_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_terminal).count()
    }

    /// Looks up a node by id.
    ///
    /// # Returns
    ///
    /// * `Ok(&TrieNode)` - The node.
    /// * `Err(SimilarityTrieError::UnknownNode)` - If the id is not from this trie.
    pub fn node(&self, id: NodeId) -> SimilarityTrieResult<&TrieNode> {
        self.nodes
            .get(id.index())
            .ok_or(SimilarityTrieError::UnknownNode(id))
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Splits a node's segment at `offset`.
    ///
    /// The node keeps its id and the first `offset` symbols. A new tail node
    /// takes the remaining symbols together with all of the node's children
    /// and its terminal marker, and becomes the node's only child. Every full
    /// value stored below the node is unchanged.
    ///
    /// # Arguments
    ///
    /// * `id` - The node to split.
    /// * `offset` - Symbols to keep on the node; must satisfy `1 <= offset < len(segment)`.
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The newly created tail node.
    /// * `Err(SimilarityTrieError)` - If the offset is out of range or the id is unknown.
    pub fn split(&mut self, id: NodeId, offset: usize) -> SimilarityTrieResult<NodeId> {
        let len = self.node(id)?.segment.len();
        if len < 2 || offset == 0 || offset >= len {
            return Err(SimilarityTrieError::InvalidSplit { offset, len });
        }

        let tail_id = NodeId::new(self.nodes.len());
        let head = &mut self.nodes[id.index()];
        let tail_segment = head.segment.split_off(offset);
        let children = std::mem::take(&mut head.children);
        let is_terminal = std::mem::replace(&mut head.is_terminal, false);
        head.children.insert(tail_segment[0], tail_id);

        let moved: Vec<NodeId> = children.values().copied().collect();
        self.nodes.push(TrieNode {
            segment: tail_segment,
            children,
            parent: Some(id),
            is_terminal,
        });
        for child in moved {
            self.nodes[child.index()].parent = Some(tail_id);
        }

        tracing::trace!(node = %id, tail = %tail_id, offset, "split node");
        Ok(tail_id)
    }

    /// Inserts a key starting at the root.
    ///
    /// # Arguments
    ///
    /// * `key` - The symbols to insert.
    ///
    /// # Returns
    ///
    /// * `Ok(Insertion)` - The node representing the key and any split-off tail.
    /// * `Err(SimilarityTrieError)` - If the key is empty or does not fit under the root.
    pub fn add(&mut self, key: impl AsRef<[Symbol]>) -> SimilarityTrieResult<Insertion> {
        self.add_from(NodeId::ROOT, key.as_ref())
    }

    /// Inserts a key into the subtree rooted at `start`.
    ///
    /// `key` is matched against `start`'s own segment first, so it must
    /// include that segment.
    pub fn add_from(&mut self, start: NodeId, key: &[Symbol]) -> SimilarityTrieResult<Insertion> {
        let insertion = self.insert(start, key)?;
        self.widen_symbols(SymbolWidth::of(key));
        Ok(insertion)
    }

    fn insert(&mut self, start: NodeId, key: &[Symbol]) -> SimilarityTrieResult<Insertion> {
        if key.is_empty() {
            return Err(SimilarityTrieError::EmptyKey);
        }
        self.node(start)?;

        let mut current = start;
        let mut rest = key;
        loop {
            let node = &self.nodes[current.index()];
            let segment_len = node.segment.len();
            let shared = common_prefix_len(rest, &node.segment);
            if shared > rest.len().min(segment_len) {
                return Err(SimilarityTrieError::Internal(format!(
                    "shared prefix {shared} exceeds key length {} or segment length {segment_len}",
                    rest.len()
                )));
            }

            if shared == segment_len {
                if shared == rest.len() {
                    let node = &mut self.nodes[current.index()];
                    let created = !node.is_terminal;
                    node.is_terminal = true;
                    return Ok(Insertion {
                        node: current,
                        split_tail: None,
                        created,
                    });
                }

                match node.child(rest[shared]) {
                    Some(child) => {
                        current = child;
                        rest = &rest[shared..];
                    }
                    None => {
                        let id = self.attach(current, rest[shared..].to_vec());
                        return Ok(Insertion {
                            node: id,
                            split_tail: None,
                            created: true,
                        });
                    }
                }
                continue;
            }

            // Child dispatch already matched the first symbol, so only the
            // starting node can disagree at offset zero.
            if shared == 0 {
                let width = self.symbol_width.max(SymbolWidth::of(key));
                return Err(SimilarityTrieError::OutsideRoot {
                    key: render_symbols(key, width),
                    root: render_symbols(&node.segment, width),
                });
            }

            let tail = self.split(current, shared)?;
            if shared == rest.len() {
                self.nodes[current.index()].is_terminal = true;
                return Ok(Insertion {
                    node: current,
                    split_tail: Some(tail),
                    created: true,
                });
            }

            let id = self.attach(current, rest[shared..].to_vec());
            return Ok(Insertion {
                node: id,
                split_tail: Some(tail),
                created: true,
            });
        }
    }

    /// Exact structural lookup from the root.
    ///
    /// Succeeds when the key ends exactly on a node boundary, whether or not
    /// that node was itself inserted as a key; see [`Self::contains`].
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The node whose full value equals `key`.
    /// * `Err(SimilarityTrieError::KeyNotFound)` - With the point where matching stopped.
    pub fn find(&self, key: impl AsRef<[Symbol]>) -> SimilarityTrieResult<NodeId> {
        self.find_from(NodeId::ROOT, key.as_ref())
    }

    /// Exact structural lookup in the subtree rooted at `start`.
    pub fn find_from(&self, start: NodeId, key: &[Symbol]) -> SimilarityTrieResult<NodeId> {
        self.node(start)?;

        let mut current = start;
        let mut rest = key;
        loop {
            let node = &self.nodes[current.index()];
            let shared = common_prefix_len(rest, &node.segment);
            if shared < node.segment.len() {
                let reason = if shared == rest.len() {
                    MissReason::Exhausted
                } else {
                    MissReason::Diverged
                };
                return Err(SimilarityTrieError::KeyNotFound {
                    key: self.render(key),
                    reason,
                });
            }
            if shared == rest.len() {
                return Ok(current);
            }
            match node.child(rest[shared]) {
                Some(child) => {
                    current = child;
                    rest = &rest[shared..];
                }
                None => {
                    return Err(SimilarityTrieError::KeyNotFound {
                        key: self.render(key),
                        reason: MissReason::MissingChild,
                    })
                }
            }
        }
    }

    /// Whether `key` was inserted (not merely a branching point).
    pub fn contains(&self, key: impl AsRef<[Symbol]>) -> bool {
        self.find(key)
            .map(|id| self.nodes[id.index()].is_terminal)
            .unwrap_or(false)
    }

    /// Creates a terminal child of `parent` holding `segment`.
    fn attach(&mut self, parent: NodeId, segment: Vec<Symbol>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let first = segment[0];
        let mut node = TrieNode::new(segment, Some(parent));
        node.is_terminal = true;
        self.nodes.push(node);
        self.nodes[parent.index()].children.insert(first, id);
        tracing::trace!(node = %id, parent = %parent, "attached node");
        id
    }
}

impl Default for SimilarityTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the longest common prefix of two symbol strings.
pub fn common_prefix_len(a: &[Symbol], b: &[Symbol]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
