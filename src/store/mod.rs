// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Identity store.
//!
//! Persists one [`IdentityRecord`] per fingerprinted repository as a JSON
//! file, exports the records as CSV, and reads the CSV lists that drive a
//! batch import.
//!
//! The store is shared between import workers, so its records sit behind a
//! `parking_lot::RwLock`: lookups take the read lock, `add` the write lock.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::store::{StoreError, StoreResult};
use crate::lineage::{LineageId, LineageResult};

/// Stored fingerprint of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Where the repository came from, usually its clone URL
    pub source: String,

    /// Short display name
    pub nickname: Option<String>,

    /// Lineage id in its textual form
    pub lineage_id: String,

    /// Bits sampled per commit
    pub prefix_length: u8,
}

impl IdentityRecord {
    /// Builds a record from a computed lineage id.
    pub fn new(source: impl Into<String>, nickname: Option<String>, lineage: &LineageId) -> Self {
        Self {
            source: source.into(),
            nickname: nickname.filter(|name| !name.is_empty()),
            lineage_id: lineage.to_string(),
            prefix_length: lineage.prefix_length(),
        }
    }

    /// The nickname when set, otherwise the source.
    pub fn label(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.source)
    }

    /// Parses the stored lineage id.
    pub fn lineage(&self) -> LineageResult<LineageId> {
        LineageId::from_hex(&self.lineage_id, self.prefix_length)
    }
}

/// Thread-safe collection of identity records backed by a JSON file.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    records: RwLock<Vec<IdentityRecord>>,
}

impl IdentityStore {
    /// Loads the store at `path`; a missing file yields an empty store.
    ///
    /// # Returns
    ///
    /// * `Ok(IdentityStore)` - The loaded store.
    /// * `Err(StoreError)` - If the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "store file not found, starting empty");
                Vec::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        info!(path = %path.display(), records = records.len(), "opened identity store");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// An empty store that will save to `path`.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// File the store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a record exists for `source`, ignoring any URL scheme.
    pub fn has(&self, source: &str) -> bool {
        let wanted = normalize_source(source);
        self.records
            .read()
            .iter()
            .any(|record| normalize_source(&record.source) == wanted)
    }

    /// Adds a record.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record was stored in memory; call [`Self::save`] to persist.
    /// * `Err(StoreError::Duplicate)` - If a record for the same source exists.
    pub fn add(&self, record: IdentityRecord) -> StoreResult<()> {
        let wanted = normalize_source(&record.source);
        let mut records = self.records.write();
        if records
            .iter()
            .any(|existing| normalize_source(&existing.source) == wanted)
        {
            return Err(StoreError::Duplicate(record.source));
        }
        debug!(source = %record.source, lineage_id = %record.lineage_id, "stored identity");
        records.push(record);
        Ok(())
    }

    /// Record for `source`, ignoring any URL scheme.
    pub fn get_by_source(&self, source: &str) -> Option<IdentityRecord> {
        let wanted = normalize_source(source);
        self.records
            .read()
            .iter()
            .find(|record| normalize_source(&record.source) == wanted)
            .cloned()
    }

    /// Record whose nickname is `nickname`.
    pub fn get_by_nickname(&self, nickname: &str) -> Option<IdentityRecord> {
        self.records
            .read()
            .iter()
            .find(|record| record.nickname.as_deref() == Some(nickname))
            .cloned()
    }

    /// Snapshot of every record in insertion order.
    pub fn all(&self) -> Vec<IdentityRecord> {
        self.records.read().clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Writes the records to the store file as pretty JSON.
    pub fn save(&self) -> StoreResult<()> {
        let json = {
            let records = self.records.read();
            serde_json::to_string_pretty(&*records).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), records = self.len(), "saved identity store");
        Ok(())
    }

    /// Writes every record to `path` as CSV with a header row.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        let records = self.records.read();
        for record in records.iter() {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        info!(path = %path.as_ref().display(), records = records.len(), "exported identities");
        Ok(records.len())
    }
}

/// One row of an import list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoImport {
    /// Repository source
    pub source: String,

    /// Display name; defaults to the source
    pub nickname: String,

    /// Explicit commit listing for this repository
    pub history: Option<PathBuf>,
}

/// Reads an import list: CSV rows of `source[,nickname[,history]]`.
///
/// The file has no header. Fields are trimmed, blank lines and lines starting
/// with `#` are skipped.
pub fn read_import_list(path: impl AsRef<Path>) -> StoreResult<Vec<RepoImport>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path.as_ref())?;

    let mut imports = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|pos| pos.line()).unwrap_or_default();
        let field = |i: usize| row.get(i).filter(|value| !value.is_empty());

        let Some(source) = field(0) else {
            if row.iter().all(str::is_empty) {
                continue;
            }
            return Err(StoreError::InvalidRow {
                line,
                message: "missing source".to_string(),
            });
        };
        if row.len() > 3 {
            return Err(StoreError::InvalidRow {
                line,
                message: format!("expected at most 3 fields, found {}", row.len()),
            });
        }

        imports.push(RepoImport {
            source: source.to_string(),
            nickname: field(1).unwrap_or(source).to_string(),
            history: field(2).map(PathBuf::from),
        });
    }
    Ok(imports)
}

/// Source with any `scheme://` prefix and trailing slash removed.
fn normalize_source(source: &str) -> &str {
    let source = source.trim();
    source
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(source)
        .trim_end_matches('/')
}
