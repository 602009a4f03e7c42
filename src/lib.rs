// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! CodeDNA Library
//!
//! Fingerprints git repositories by their commit history and compares the
//! fingerprints to find clones, forks, and shared ancestry.
//!
//! # Architecture
//!
//! - [`lineage`]: derives a lineage id from a commit listing
//! - [`data_structures`]: the similarity trie and the label-indexed tree
//! - [`store`]: persisted identity records, CSV export and import lists
//! - [`import`]: concurrent batch fingerprinting
//! - [`config`], [`error`], [`context`]: the ambient application layer
//! - [`commands`]: what the `codedna` binary runs

pub mod commands;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod import;
pub mod lineage;
pub mod store;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

// Feature-gated modules
#[cfg(feature = "benchmarking")]
pub mod bench;

/// Version information for CodeDNA.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
