// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node implementation for the similarity trie.
//!
//! Nodes live in the trie's arena and refer to each other by [`NodeId`].
//! A node stores only its own segment of the key; the full key is the
//! concatenation of segments from the root down to the node.

use std::collections::BTreeMap;
use std::fmt;

/// One key symbol. Fingerprints use nibble values `0..=15`; arbitrary bytes
/// are accepted as well.
pub type Symbol = u8;

/// Stable handle to a node in a [`super::SimilarityTrie`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every trie.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the similarity trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    /// Symbols between the parent and this node
    pub(crate) segment: Vec<Symbol>,

    /// Children keyed by the first symbol of their segment
    pub(crate) children: BTreeMap<Symbol, NodeId>,

    /// Non-owning link to the parent; `None` for the root
    pub(crate) parent: Option<NodeId>,

    /// Whether an inserted key ends exactly at this node
    pub(crate) is_terminal: bool,
}

impl TrieNode {
    /// Creates a detached node holding `segment`.
    pub(crate) fn new(segment: Vec<Symbol>, parent: Option<NodeId>) -> Self {
        Self {
            segment,
            children: BTreeMap::new(),
            parent,
            is_terminal: false,
        }
    }

    /// The symbols stored on this node.
    pub fn segment(&self) -> &[Symbol] {
        &self.segment
    }

    /// The parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The child whose segment starts with `symbol`.
    pub fn child(&self, symbol: Symbol) -> Option<NodeId> {
        self.children.get(&symbol).copied()
    }

    /// Children in symbol order.
    pub fn children(&self) -> impl Iterator<Item = (Symbol, NodeId)> + '_ {
        self.children.iter().map(|(symbol, id)| (*symbol, *id))
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether some inserted key ends exactly here.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Text width of one rendered symbol.
///
/// A trie renders every symbol at one width, so two different symbol
/// strings never render to the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SymbolWidth {
    /// One hex digit; every symbol is `0..=15`
    #[default]
    Nibble,

    /// Two hex digits per symbol
    Byte,
}

impl SymbolWidth {
    /// Narrowest width that renders every symbol in `symbols`.
    pub fn of(symbols: &[Symbol]) -> Self {
        if symbols.iter().any(|symbol| *symbol > 0xF) {
            Self::Byte
        } else {
            Self::Nibble
        }
    }

    /// Width for symbols drawn from `bits`-bit commit prefixes.
    pub fn for_prefix_length(bits: u8) -> Self {
        if bits <= 4 {
            Self::Nibble
        } else {
            Self::Byte
        }
    }
}

/// Renders symbols as lowercase hex at `width`.
pub fn render_symbols(symbols: &[Symbol], width: SymbolWidth) -> String {
    let mut out = String::with_capacity(symbols.len() * 2);
    for symbol in symbols {
        match width {
            SymbolWidth::Nibble => out.push_str(&format!("{symbol:x}")),
            SymbolWidth::Byte => out.push_str(&format!("{symbol:02x}")),
        }
    }
    out
}
