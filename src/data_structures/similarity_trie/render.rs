// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Indented text dump of a trie.

use std::fmt;

use super::{NodeId, SimilarityTrie};

/// Per-node note appended to a rendered line.
pub type Annotate<'a> = &'a dyn Fn(NodeId) -> Option<String>;

/// Lazily formats a subtree, one node per line, two spaces per level.
/// Terminal nodes are marked with `*`.
#[derive(Clone, Copy)]
pub struct TrieDisplay<'a> {
    trie: &'a SimilarityTrie,
    start: NodeId,
    annotate: Option<Annotate<'a>>,
}

impl SimilarityTrie {
    /// Formats the whole trie.
    pub fn display(&self) -> TrieDisplay<'_> {
        self.display_from(NodeId::ROOT)
    }

    /// Formats the subtree rooted at `start`.
    pub fn display_from(&self, start: NodeId) -> TrieDisplay<'_> {
        TrieDisplay {
            trie: self,
            start,
            annotate: None,
        }
    }
}

impl<'a> TrieDisplay<'a> {
    /// Appends `annotate(node)` after each node that has a note.
    pub fn annotated(self, annotate: Annotate<'a>) -> Self {
        Self {
            annotate: Some(annotate),
            ..self
        }
    }
}

impl fmt::Debug for TrieDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieDisplay")
            .field("start", &self.start)
            .field("annotated", &self.annotate.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TrieDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(_) = self.trie.node(self.start) else {
            return write!(f, "<unknown node {}>", self.start);
        };

        let mut stack = vec![(self.start, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.trie.nodes[id.index()];
            let segment = if node.segment.is_empty() && node.is_root() {
                "(root)".to_string()
            } else {
                self.trie.render(&node.segment)
            };
            let marker = if node.is_terminal { "*" } else { "" };
            write!(f, "{:indent$}{segment}{marker}", "", indent = depth * 2)?;
            if let Some(note) = self.annotate.and_then(|annotate| annotate(id)) {
                write!(f, "  {note}")?;
            }
            writeln!(f)?;
            stack.extend(node.children.values().rev().map(|child| (*child, depth + 1)));
        }
        Ok(())
    }
}
