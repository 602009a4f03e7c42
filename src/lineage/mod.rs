// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lineage fingerprints.
//!
//! A [`LineageId`] samples the top `prefix_length` bits of the first byte of
//! every commit hash in a repository's history, producing one small symbol per
//! commit. Two repositories that share history share long runs of symbols,
//! which is what the similarity tree compares.
//!
//! Histories arrive most recent commit first, the order `git rev-list HEAD`
//! prints, and the textual form keeps that order. [`LineageId::trie_key`]
//! reverses it so that keys start at the root commit and shared early history
//! becomes a shared key prefix.
//!
//! # Example
//!
//! ```
//! use codedna_lib::lineage::{parse_commit_list, LineageId};
//!
//! let listing = "\
//! 9a8f1c0000000000000000000000000000000000
//! 3b00000000000000000000000000000000000000
//! ";
//! let hashes = parse_commit_list(listing).unwrap();
//! let id = LineageId::from_hashes(&hashes, 4).unwrap();
//!
//! assert_eq!(id.to_string(), "93");
//! assert_eq!(id.trie_key(), vec![0x3, 0x9]);
//! ```

mod error;

use std::fmt;
use std::str::FromStr;

pub use error::{LineageError, LineageResult};

/// Length of a SHA-1 commit hash in bytes.
pub const HASH_LEN: usize = 20;

/// Bits sampled per commit when nothing else is configured.
pub const DEFAULT_PREFIX_LENGTH: u8 = 4;

/// A 160-bit commit hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitHash([u8; HASH_LEN]);

impl CommitHash {
    /// Wraps raw hash bytes.
    pub fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Top `bits` bits of the first byte; `bits` must be in `1..=8`.
    fn leading_bits(&self, bits: u8) -> u8 {
        self.0[0] >> (8 - bits)
    }
}

impl FromStr for CommitHash {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LineageError::InvalidCommitHash(s.to_string());
        if s.len() != HASH_LEN * 2 || !s.is_ascii() {
            return Err(invalid());
        }

        let mut bytes = [0u8; HASH_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Parses a commit listing: one hash per line, blank lines and `#` comments
/// ignored.
pub fn parse_commit_list(text: &str) -> LineageResult<Vec<CommitHash>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, value)| {
            value.parse().map_err(|err| LineageError::InvalidListing {
                line,
                source: Box::new(err),
            })
        })
        .collect()
}

/// Compact fingerprint of a repository's commit history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineageId {
    /// One symbol per commit, most recent first
    symbols: Vec<u8>,

    /// Bits sampled from each commit
    prefix_length: u8,
}

impl LineageId {
    /// Derives a lineage id from a history listed most recent first.
    ///
    /// # Arguments
    ///
    /// * `hashes` - Commit hashes, most recent first.
    /// * `prefix_length` - Bits to sample from each hash, `1..=8`.
    ///
    /// # Returns
    ///
    /// * `Ok(LineageId)` - The fingerprint.
    /// * `Err(LineageError)` - If the prefix length is unsupported or the history is empty.
    pub fn from_hashes(hashes: &[CommitHash], prefix_length: u8) -> LineageResult<Self> {
        validate_prefix_length(prefix_length)?;
        if hashes.is_empty() {
            return Err(LineageError::EmptyHistory);
        }

        let symbols = hashes
            .iter()
            .map(|hash| hash.leading_bits(prefix_length))
            .collect();
        Ok(Self {
            symbols,
            prefix_length,
        })
    }

    /// Builds a lineage id from already-sampled symbols, most recent first.
    pub fn from_symbols(symbols: Vec<u8>, prefix_length: u8) -> LineageResult<Self> {
        validate_prefix_length(prefix_length)?;
        if symbols.is_empty() {
            return Err(LineageError::EmptyHistory);
        }
        let limit = 1u16 << prefix_length;
        if let Some(&symbol) = symbols.iter().find(|&&s| u16::from(s) >= limit) {
            return Err(LineageError::InvalidSymbol {
                symbol,
                prefix_length,
            });
        }
        Ok(Self {
            symbols,
            prefix_length,
        })
    }

    /// Parses the textual form produced by `Display`.
    ///
    /// Prefix lengths up to 4 use one hex digit per symbol, longer ones two.
    pub fn from_hex(text: &str, prefix_length: u8) -> LineageResult<Self> {
        validate_prefix_length(prefix_length)?;
        let invalid = || LineageError::InvalidText(text.to_string());
        if !text.is_ascii() {
            return Err(invalid());
        }

        let width = symbol_width(prefix_length);
        if text.len() % width != 0 {
            return Err(invalid());
        }
        let symbols = (0..text.len())
            .step_by(width)
            .map(|i| u8::from_str_radix(&text[i..i + width], 16).map_err(|_| invalid()))
            .collect::<LineageResult<Vec<u8>>>()?;
        Self::from_symbols(symbols, prefix_length)
    }

    /// Symbols in history order, most recent first.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Bits sampled per commit.
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of commits fingerprinted.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false` for a successfully built id.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols from the root commit forward, the order used as a trie key.
    pub fn trie_key(&self) -> Vec<u8> {
        self.symbols.iter().rev().copied().collect()
    }

    /// Two symbols per byte; only defined for prefix lengths up to 4.
    pub fn to_packed_bytes(&self) -> LineageResult<Vec<u8>> {
        if self.prefix_length > 4 {
            return Err(LineageError::InvalidPrefixLength(self.prefix_length));
        }
        pack_nibbles(&self.symbols)
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = symbol_width(self.prefix_length);
        for symbol in &self.symbols {
            write!(f, "{symbol:0width$x}")?;
        }
        Ok(())
    }
}

fn validate_prefix_length(prefix_length: u8) -> LineageResult<()> {
    if (1..=8).contains(&prefix_length) {
        Ok(())
    } else {
        Err(LineageError::InvalidPrefixLength(prefix_length))
    }
}

fn symbol_width(prefix_length: u8) -> usize {
    if prefix_length <= 4 {
        1
    } else {
        2
    }
}

/// Packs nibbles two per byte, high nibble first; an odd tail is padded with
/// a zero nibble.
pub fn pack_nibbles(nibbles: &[u8]) -> LineageResult<Vec<u8>> {
    let mut bytes = vec![0u8; (nibbles.len() + 1) / 2];
    for (i, &nibble) in nibbles.iter().enumerate() {
        if nibble > 0xF {
            return Err(LineageError::InvalidSymbol {
                symbol: nibble,
                prefix_length: 4,
            });
        }
        if i % 2 == 0 {
            bytes[i / 2] = nibble << 4;
        } else {
            bytes[i / 2] |= nibble;
        }
    }
    Ok(bytes)
}

/// Owner and repository name from a hosting URL such as
/// `https://github.com/owner/repo.git`.
pub fn repo_owner_and_name(url: &str) -> Option<(String, String)> {
    let path = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url)
        .trim_end_matches('/');
    let mut parts = path.rsplit('/');
    let name = parts.next()?.trim_end_matches(".git");
    let owner = parts.next()?;
    // The owner must not be the host itself.
    parts.next()?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_with_first_byte(first: u8) -> CommitHash {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = first;
        bytes[HASH_LEN - 1] = 0xAB;
        CommitHash::new(bytes)
    }

    #[test]
    fn test_commit_hash_parse_and_display() {
        let text = "b7e1a36fc7d3322703117c6b5bf6cd285dec59d6";
        let hash: CommitHash = text.parse().unwrap();
        assert_eq!(hash.as_bytes()[0], 0xb7);
        assert_eq!(hash.to_string(), text);

        assert!("b7e1".parse::<CommitHash>().is_err());
        assert!("zz".repeat(20).parse::<CommitHash>().is_err());
    }

    #[test]
    fn test_parse_commit_list() {
        let listing = "# history\n\nb7e1a36fc7d3322703117c6b5bf6cd285dec59d6\n  1000000000000000000000000000000000000000  \n";
        let hashes = parse_commit_list(listing).unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[1].as_bytes()[0], 0x10);

        let err = parse_commit_list("b7e1a36fc7d3322703117c6b5bf6cd285dec59d6\nnope\n").unwrap_err();
        assert!(matches!(err, LineageError::InvalidListing { line: 2, .. }));
    }

    #[test]
    fn test_from_hashes_samples_leading_bits() {
        let hashes = [
            hash_with_first_byte(0x9f),
            hash_with_first_byte(0xe0),
            hash_with_first_byte(0x0c),
        ];

        let id = LineageId::from_hashes(&hashes, 4).unwrap();
        assert_eq!(id.symbols(), &[0x9, 0xe, 0x0]);
        assert_eq!(id.to_string(), "9e0");
        assert_eq!(id.trie_key(), vec![0x0, 0xe, 0x9]);

        let id = LineageId::from_hashes(&hashes, 1).unwrap();
        assert_eq!(id.symbols(), &[1, 1, 0]);

        let id = LineageId::from_hashes(&hashes, 8).unwrap();
        assert_eq!(id.to_string(), "9fe00c");
    }

    #[test]
    fn test_from_hashes_rejects_bad_input() {
        let hashes = [hash_with_first_byte(0x9f)];
        assert_eq!(
            LineageId::from_hashes(&hashes, 0),
            Err(LineageError::InvalidPrefixLength(0))
        );
        assert_eq!(
            LineageId::from_hashes(&hashes, 9),
            Err(LineageError::InvalidPrefixLength(9))
        );
        assert_eq!(LineageId::from_hashes(&[], 4), Err(LineageError::EmptyHistory));
    }

    #[test]
    fn test_from_hex() {
        let id = LineageId::from_hex("9ee37c", 4).unwrap();
        assert_eq!(id.symbols(), &[0x9, 0xe, 0xe, 0x3, 0x7, 0xc]);
        assert_eq!(id.to_string(), "9ee37c");

        let id = LineageId::from_hex("ff01", 8).unwrap();
        assert_eq!(id.symbols(), &[0xff, 0x01]);

        assert!(LineageId::from_hex("9g", 4).is_err());
        assert!(LineageId::from_hex("fff", 8).is_err());
        assert_eq!(
            LineageId::from_hex("4", 2),
            Err(LineageError::InvalidSymbol {
                symbol: 4,
                prefix_length: 2
            })
        );
    }

    #[test]
    fn test_pack_nibbles() {
        assert_eq!(pack_nibbles(&[0xA, 0xB, 0xC]).unwrap(), vec![0xAB, 0xC0]);
        assert_eq!(pack_nibbles(&[]).unwrap(), Vec::<u8>::new());
        assert!(pack_nibbles(&[0x10]).is_err());

        let id = LineageId::from_hex("9ee37c", 4).unwrap();
        assert_eq!(id.to_packed_bytes().unwrap(), vec![0x9e, 0xe3, 0x7c]);
    }

    #[test]
    fn test_repo_owner_and_name() {
        assert_eq!(
            repo_owner_and_name("https://github.com/MoralCode/CodeDNA"),
            Some(("MoralCode".to_string(), "CodeDNA".to_string()))
        );
        assert_eq!(
            repo_owner_and_name("github.com/owner/repo.git/"),
            Some(("owner".to_string(), "repo".to_string()))
        );
        assert_eq!(repo_owner_and_name("https://github.com/owner"), None);
        assert_eq!(repo_owner_and_name("repo"), None);
    }
}
