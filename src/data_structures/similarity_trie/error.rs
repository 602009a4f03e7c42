// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the similarity trie.

use std::fmt;

use super::node::NodeId;

/// Broad classification of trie failures.
///
/// Callers use this to decide between skipping one input and aborting:
/// `InvalidArgument` and `NotFound` are ordinary, recoverable outcomes, while
/// `Internal` means the trie's single-root invariant no longer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input to a structural operation.
    InvalidArgument,
    /// A key or label could not be located.
    NotFound,
    /// The trie structure is corrupted.
    Internal,
}

/// Where a lookup stopped matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Key and segment disagree on a symbol inside the segment.
    Diverged,
    /// Key ran out before the end of a segment.
    Exhausted,
    /// Key continues past a node that has no child for the next symbol.
    MissingChild,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Diverged => "diverged inside a segment",
            Self::Exhausted => "key ended inside a segment",
            Self::MissingChild => "no child for the next symbol",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in similarity trie operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum SimilarityTrieError {
    /// Error when an empty key is provided.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// Split offset outside `1..len(segment)`.
    #[error("Cannot split segment of length {len} at offset {offset}")]
    InvalidSplit {
        /// Requested offset.
        offset: usize,
        /// Length of the segment being split.
        len: usize,
    },

    /// The key does not start with the root's own segment.
    #[error("Key '{key}' does not begin with root segment '{root}'")]
    OutsideRoot {
        /// The rejected key.
        key: String,
        /// The root segment.
        root: String,
    },

    /// The given node is not on the other node's parent chain.
    #[error("Node {ancestor} is not an ancestor of node {node}")]
    NotAncestor {
        /// Node whose chain was walked.
        node: NodeId,
        /// Node that was expected on that chain.
        ancestor: NodeId,
    },

    /// The node id does not belong to this trie.
    #[error("Node {0} is not part of this trie")]
    UnknownNode(NodeId),

    /// Exact-match lookup failed.
    #[error("Key not found: '{key}' ({reason})")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
        /// Where matching stopped.
        reason: MissReason,
    },

    /// A label is not present in the label index.
    #[error("Label not found: {0}")]
    LabelNotFound(String),

    /// Two nodes share no ancestor.
    #[error("Nodes {0} and {1} have no common ancestor")]
    NoCommonAncestor(NodeId, NodeId),

    /// Any other broken structural invariant.
    #[error("Internal trie error: {0}")]
    Internal(String),
}

impl SimilarityTrieError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyKey
            | Self::InvalidSplit { .. }
            | Self::OutsideRoot { .. }
            | Self::NotAncestor { .. }
            | Self::UnknownNode(_) => ErrorKind::InvalidArgument,
            Self::KeyNotFound { .. } | Self::LabelNotFound(_) => ErrorKind::NotFound,
            Self::NoCommonAncestor(..) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a batch caller may skip the offending input and continue.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

/// Result type for similarity trie operations.
pub type SimilarityTrieResult<T> = Result<T, SimilarityTrieError>;
