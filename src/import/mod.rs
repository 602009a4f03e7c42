// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Batch import.
//!
//! Fingerprints many repositories concurrently and records the results in a
//! shared [`IdentityStore`]. Commit histories come from a [`HistorySource`],
//! so the importer itself never touches git.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::error::import::{ImportError, ImportResult};
use crate::lineage::{parse_commit_list, repo_owner_and_name, CommitHash, LineageId};
use crate::store::{IdentityRecord, IdentityStore, RepoImport};

/// Supplies the commit history of a repository, most recent commit first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Commit hashes for the repository named by `request`.
    async fn commit_hashes(&self, request: &RepoImport) -> ImportResult<Vec<CommitHash>>;
}

/// Reads commit listings, one hash per line, from files on disk.
///
/// A row's explicit history path is used when present. Otherwise the file is
/// `<history_dir>/<owner>_<repo>.txt`, derived from the source URL.
#[derive(Debug, Clone)]
pub struct HashFileSource {
    history_dir: PathBuf,
}

impl HashFileSource {
    /// Creates a source reading from `history_dir`.
    pub fn new(history_dir: impl AsRef<Path>) -> Self {
        Self {
            history_dir: history_dir.as_ref().to_path_buf(),
        }
    }

    /// File that holds the history for `request`.
    pub fn history_path(&self, request: &RepoImport) -> ImportResult<PathBuf> {
        if let Some(path) = &request.history {
            return Ok(path.clone());
        }
        let (owner, name) = repo_owner_and_name(&request.source)
            .ok_or_else(|| ImportError::HistoryUnavailable(request.source.clone()))?;
        Ok(self.history_dir.join(format!("{owner}_{name}.txt")))
    }
}

#[async_trait]
impl HistorySource for HashFileSource {
    async fn commit_hashes(&self, request: &RepoImport) -> ImportResult<Vec<CommitHash>> {
        let path = self.history_path(request)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ImportError::HistoryRead {
                path: path.clone(),
                source,
            })?;
        parse_commit_list(&text).map_err(|error| ImportError::Fingerprint {
            source_name: request.source.clone(),
            error,
        })
    }
}

/// Totals for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Result of importing one row.
enum Outcome {
    Imported,
    Skipped,
    Failed,
}

/// Fingerprints repositories with a bounded number in flight.
pub struct BatchImporter {
    source: Arc<dyn HistorySource>,
    store: Arc<IdentityStore>,
    workers: usize,
    prefix_length: u8,
    skip_existing: bool,
}

impl BatchImporter {
    /// Creates an importer.
    ///
    /// # Arguments
    ///
    /// * `source` - Where commit histories come from.
    /// * `store` - Store receiving the records.
    /// * `workers` - Maximum repositories fingerprinted at once; zero is treated as one.
    /// * `prefix_length` - Bits sampled per commit.
    pub fn new(
        source: Arc<dyn HistorySource>,
        store: Arc<IdentityStore>,
        workers: usize,
        prefix_length: u8,
    ) -> Self {
        Self {
            source,
            store,
            workers: workers.max(1),
            prefix_length,
            skip_existing: true,
        }
    }

    /// Whether sources already in the store are skipped (default `true`).
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// Imports every row, logging and counting failures instead of stopping.
    ///
    /// The store is saved once at the end when anything was imported.
    ///
    /// # Returns
    ///
    /// * `Ok(ImportSummary)` - Per-row totals.
    /// * `Err(ImportError)` - Only if the final save fails.
    #[instrument(skip_all, fields(rows = imports.len(), workers = self.workers))]
    pub async fn run(&self, imports: Vec<RepoImport>) -> ImportResult<ImportSummary> {
        let outcomes: Vec<Outcome> = stream::iter(imports)
            .map(|request| self.import_one(request))
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut summary = ImportSummary::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Imported => summary.imported += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }

        if summary.imported > 0 {
            self.store.save()?;
        }
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "import finished"
        );
        Ok(summary)
    }

    async fn import_one(&self, request: RepoImport) -> Outcome {
        if self.skip_existing && self.store.has(&request.source) {
            debug!(source = %request.source, "already stored, skipping");
            return Outcome::Skipped;
        }

        match self.fingerprint(&request).await {
            Ok(record) => match self.store.add(record) {
                Ok(()) => {
                    info!(source = %request.source, "imported");
                    Outcome::Imported
                }
                Err(e) => {
                    warn!(source = %request.source, error = %e, "import rejected by store");
                    Outcome::Failed
                }
            },
            Err(e) => {
                warn!(source = %request.source, error = %e, "import failed");
                Outcome::Failed
            }
        }
    }

    async fn fingerprint(&self, request: &RepoImport) -> ImportResult<IdentityRecord> {
        let hashes = self.source.commit_hashes(request).await?;
        let lineage =
            LineageId::from_hashes(&hashes, self.prefix_length).map_err(|error| {
                ImportError::Fingerprint {
                    source_name: request.source.clone(),
                    error,
                }
            })?;
        let nickname = (request.nickname != request.source).then(|| request.nickname.clone());
        Ok(IdentityRecord::new(request.source.clone(), nickname, &lineage))
    }
}
