// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for fingerprint encoding.

/// Errors that can occur while deriving or parsing lineage ids.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum LineageError {
    /// Prefix length outside `1..=8`.
    #[error("Prefix length {0} is not supported, expected 1 to 8 bits")]
    InvalidPrefixLength(u8),

    /// No commits to fingerprint.
    #[error("Commit history is empty")]
    EmptyHistory,

    /// A commit hash that is not 40 hex digits.
    #[error("Invalid commit hash '{0}'")]
    InvalidCommitHash(String),

    /// A commit listing line that could not be parsed.
    #[error("Line {line}: {source}")]
    InvalidListing {
        /// 1-based line number.
        line: usize,
        /// The underlying parse failure.
        source: Box<LineageError>,
    },

    /// A symbol that does not fit in the prefix length.
    #[error("Symbol {symbol} does not fit in {prefix_length} bits")]
    InvalidSymbol {
        /// The offending symbol.
        symbol: u8,
        /// Bits per symbol.
        prefix_length: u8,
    },

    /// Malformed textual lineage id.
    #[error("Invalid lineage id text '{0}'")]
    InvalidText(String),
}

/// Result type for lineage operations.
pub type LineageResult<T> = Result<T, LineageError>;
