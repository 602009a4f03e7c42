// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Identity store error module.
//!
//! This module defines error types that may occur while loading, updating,
//! saving, or exporting the identity store and while reading import lists.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during identity store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error when a record for the same source already exists.
    #[error("Repository already stored: {0}")]
    Duplicate(String),

    /// Error when no stored record matches a nickname or source.
    #[error("No stored repository named {0}")]
    NotFound(String),

    /// Error when the store file cannot be read or written.
    #[error("Store file {path:?}: {source}")]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error when the store file is not valid JSON.
    #[error("Corrupt store file {path:?}: {source}")]
    Corrupt {
        /// The file being parsed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Error when reading or writing CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error when an import list row is unusable.
    #[error("Invalid import row {line}: {message}")]
    InvalidRow {
        /// One-based line number
        line: u64,
        /// What is wrong with the row
        message: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
