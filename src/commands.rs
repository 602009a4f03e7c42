// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Command implementations behind the CLI.
//!
//! Each command takes the [`AppContext`] and writes its human-readable output
//! to a caller-supplied writer.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::CodeDnaConfig;
use crate::context::AppContext;
use crate::data_structures::SimilarityTree;
use crate::error::config::ConfigError;
use crate::error::store::StoreError;
use crate::error::{CodeDnaError, CodeDnaResult, ErrorContext};
use crate::import::{BatchImporter, HashFileSource, ImportSummary};
use crate::lineage::{parse_commit_list, LineageId};
use crate::store::{read_import_list, IdentityRecord};

/// Reads standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Fingerprints one commit listing and stores it when the source is new.
///
/// When `history` is not an existing file it is treated as a stored
/// nickname and the stored record is printed instead.
///
/// # Arguments
///
/// * `history` - Commit listing path, or `-` for standard input.
/// * `source` - Source to record; defaults to `history`.
/// * `nickname` - Optional display name.
#[instrument(skip(ctx, out))]
pub fn analyze(
    ctx: &AppContext,
    history: &str,
    source: Option<String>,
    nickname: Option<String>,
    out: &mut dyn Write,
) -> CodeDnaResult<IdentityRecord> {
    let text = if history == STDIN_PATH {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else if Path::new(history).exists() {
        std::fs::read_to_string(history)?
    } else {
        warn!(history, "no such listing, looking up stored nickname");
        let record = ctx
            .store
            .get_by_nickname(history)
            .ok_or_else(|| StoreError::NotFound(history.to_string()))?;
        writeln!(out, "{}", record.lineage_id)?;
        writeln!(out, "{}", record.source)?;
        return Ok(record);
    };

    let hashes = parse_commit_list(&text)?;
    let lineage = LineageId::from_hashes(&hashes, ctx.config.fingerprint.prefix_length)?;
    let record = IdentityRecord::new(source.unwrap_or_else(|| history.to_string()), nickname, &lineage);

    if !ctx.store.has(&record.source) {
        ctx.store.add(record.clone())?;
        ctx.store.save()?;
        info!(source = %record.source, "stored new identity");
    }

    writeln!(out, "{}", record.lineage_id)?;
    writeln!(out, "{}", record.source)?;
    Ok(record)
}

/// Imports every repository listed in the CSV file at `path`.
pub async fn import(
    ctx: &AppContext,
    path: &Path,
    clone_existing: bool,
    out: &mut dyn Write,
) -> CodeDnaResult<ImportSummary> {
    let imports = read_import_list(path)?;
    writeln!(out, "Importing {} repositories from {}", imports.len(), path.display())?;

    let settings = &ctx.config.import;
    let importer = BatchImporter::new(
        Arc::new(HashFileSource::new(&settings.history_dir)),
        Arc::clone(&ctx.store),
        settings.workers,
        ctx.config.fingerprint.prefix_length,
    )
    .skip_existing(settings.skip_existing && !clone_existing);

    let summary = importer.run(imports).await?;
    writeln!(
        out,
        "imported {}, skipped {}, failed {}",
        summary.imported, summary.skipped, summary.failed
    )?;
    Ok(summary)
}

/// Writes the store to `path` as CSV.
pub fn export(ctx: &AppContext, path: &Path, out: &mut dyn Write) -> CodeDnaResult<usize> {
    writeln!(out, "Exporting db to {}", path.display())?;
    Ok(ctx.store.export_csv(path)?)
}

/// Builds a similarity tree from every stored record.
///
/// Records that cannot be parsed or inserted are reported and skipped.
pub fn build_tree(ctx: &AppContext) -> SimilarityTree {
    let mut tree = SimilarityTree::new();
    for record in ctx.store.all() {
        let added = record
            .lineage()
            .map_err(CodeDnaError::from)
            .and_then(|lineage| Ok(tree.add_lineage(record.label(), &lineage)?));
        if let Err(error) = added {
            ctx.reporting.report(
                ErrorContext::new(error, "similarity")
                    .with_details(format!("skipping {}", record.source))
                    .with_span_trace(),
            );
        }
    }
    tree
}

/// Prints the tree followed by the sorted family report.
pub fn similarity(ctx: &AppContext, out: &mut dyn Write) -> CodeDnaResult<SimilarityTree> {
    let tree = build_tree(ctx);

    write!(out, "{}", tree.render())?;
    writeln!(out)?;
    writeln!(out, "===========")?;
    writeln!(out)?;
    for line in tree.report()? {
        writeln!(out, "{line}")?;
    }
    Ok(tree)
}

/// Prints the similarity score between two stored labels.
pub fn score(ctx: &AppContext, a: &str, b: &str, out: &mut dyn Write) -> CodeDnaResult<usize> {
    let tree = build_tree(ctx);
    let score = tree.similarity_score(a, b)?;
    writeln!(out, "{score}")?;
    Ok(score)
}

/// Writes the default configuration to `output` as TOML.
pub fn gen_config(output: &Path) -> CodeDnaResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(&CodeDnaConfig::default())
        .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
    std::fs::write(output, toml)?;
    info!(path = %output.display(), "default configuration written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, ENV_PREFIX};
    use crate::error::{ErrorReporter, TracingErrorReporter};
    use crate::store::IdentityStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    #[derive(Debug, Default)]
    struct CountingReporter(AtomicUsize);

    impl ErrorReporter for CountingReporter {
        fn report(&self, _context: ErrorContext) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn context(dir: &TempDir, reporter: Arc<dyn ErrorReporter>) -> AppContext {
        let mut config = CodeDnaConfig::default();
        config.store.path = dir.path().join("identities.json");
        config.import.history_dir = dir.path().join("histories");
        let store = IdentityStore::open(&config.store.path).unwrap();
        AppContext::with_parts(config, store, reporter)
    }

    fn store_lineage(ctx: &AppContext, source: &str, nickname: &str, text: &str) {
        let lineage = LineageId::from_hex(text, 4).unwrap();
        ctx.store
            .add(IdentityRecord::new(source, Some(nickname.to_string()), &lineage))
            .unwrap();
    }

    #[test]
    fn test_analyze_stores_new_listing() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir, Arc::new(TracingErrorReporter));
        let listing = dir.path().join("listing.txt");
        std::fs::write(
            &listing,
            "9a00000000000000000000000000000000000000\n3b00000000000000000000000000000000000000\n",
        )
        .unwrap();

        let mut out = Vec::new();
        let record = analyze(
            &ctx,
            listing.to_str().unwrap(),
            Some("https://github.com/a/b".to_string()),
            Some("b".to_string()),
            &mut out,
        )
        .unwrap();

        assert_eq!(record.lineage_id, "93");
        assert_eq!(String::from_utf8(out).unwrap(), "93\nhttps://github.com/a/b\n");
        assert!(ctx.store.has("github.com/a/b"));
        assert!(dir.path().join("identities.json").exists());
    }

    #[test]
    fn test_analyze_falls_back_to_nickname() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir, Arc::new(TracingErrorReporter));
        store_lineage(&ctx, "https://github.com/a/b", "b", "9ee37c");

        let mut out = Vec::new();
        analyze(&ctx, "b", None, None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "9ee37c\nhttps://github.com/a/b\n");

        let missing = analyze(&ctx, "nobody", None, None, &mut Vec::new());
        assert!(matches!(
            missing,
            Err(CodeDnaError::Store(StoreError::NotFound(name))) if name == "nobody"
        ));
    }

    #[test]
    fn test_similarity_report() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir, Arc::new(TracingErrorReporter));
        store_lineage(&ctx, "https://github.com/a/one", "one", "9ee37c");
        store_lineage(&ctx, "https://github.com/a/two", "two", "1ee37c");
        store_lineage(&ctx, "https://github.com/a/three", "three", "9aaaaa");

        let mut out = Vec::new();
        let tree = similarity(&ctx, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(tree.len(), 3);
        assert!(text.contains("==========="));
        assert!(text.contains("( one ):\ttwo"));
        assert_eq!(score(&ctx, "one", "two", &mut Vec::new()).unwrap(), 2);
        assert_eq!(score(&ctx, "one", "three", &mut Vec::new()).unwrap(), 12);
    }

    #[test]
    fn test_unparseable_record_reported_and_skipped() {
        let dir = tempdir().unwrap();
        let reporter = Arc::new(CountingReporter::default());
        let ctx = context(&dir, reporter.clone());
        store_lineage(&ctx, "https://github.com/a/one", "one", "9ee37c");
        ctx.store
            .add(IdentityRecord {
                source: "https://github.com/a/bad".to_string(),
                nickname: None,
                lineage_id: "zz".to_string(),
                prefix_length: 4,
            })
            .unwrap();

        let tree = build_tree(&ctx);
        assert_eq!(tree.len(), 1);
        assert_eq!(reporter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir, Arc::new(TracingErrorReporter));
        store_lineage(&ctx, "https://github.com/a/one", "one", "9ee37c");

        let path = dir.path().join("database.csv");
        assert_eq!(export(&ctx, &path, &mut Vec::new()).unwrap(), 1);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("source,nickname"));
    }

    #[tokio::test]
    async fn test_import_reads_histories() {
        let dir = tempdir().unwrap();
        let ctx = context(&dir, Arc::new(TracingErrorReporter));
        let histories = dir.path().join("histories");
        std::fs::create_dir_all(&histories).unwrap();
        std::fs::write(
            histories.join("a_one.txt"),
            "9a00000000000000000000000000000000000000\n",
        )
        .unwrap();
        let list = dir.path().join("repos.csv");
        std::fs::write(&list, "https://github.com/a/one,one\nhttps://github.com/a/missing\n").unwrap();

        let mut out = Vec::new();
        let summary = import(&ctx, &list, false, &mut out).await.unwrap();

        assert_eq!(summary, ImportSummary { imported: 1, skipped: 0, failed: 1 });
        assert_eq!(ctx.store.get_by_nickname("one").unwrap().lineage_id, "9");
    }

    #[test]
    fn test_gen_config_round_trips_through_loader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("codedna.toml");
        gen_config(&path).unwrap();

        let loaded = ConfigLoader::new(Some(&path), &format!("{ENV_PREFIX}_GEN_TEST"))
            .load()
            .unwrap();
        assert_eq!(loaded, CodeDnaConfig::default());
    }
}
