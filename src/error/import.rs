// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Batch import error module.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::store::StoreError;
use crate::lineage::LineageError;

/// Errors that can occur while importing one repository.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Error when no history file can be located for a source.
    #[error("No history available for {0}")]
    HistoryUnavailable(String),

    /// Error when a history file cannot be read.
    #[error("Failed to read history {path:?}: {source}")]
    HistoryRead {
        /// The history file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error when a history cannot be fingerprinted.
    #[error("Fingerprint error for {source_name}: {error}")]
    Fingerprint {
        /// The repository being imported
        source_name: String,
        /// The underlying error
        #[source]
        error: LineageError,
    },

    /// Error when the store rejects the record.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_error_display() {
        let err = ImportError::Fingerprint {
            source_name: "https://github.com/a/b".to_string(),
            error: LineageError::EmptyHistory,
        };
        let message = err.to_string();
        assert!(message.contains("https://github.com/a/b"));
    }

    #[test]
    fn test_store_error_converts() {
        let err: ImportError = StoreError::Duplicate("x".to_string()).into();
        assert!(matches!(err, ImportError::Store(StoreError::Duplicate(_))));
    }
}
