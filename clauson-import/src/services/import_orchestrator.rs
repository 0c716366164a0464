//! Import orchestrator
//!
//! Drives one import run over a dataset directory:
//!
//! INIT → LOADING(file) → COMMITTED(file) → ... → DONE
//!
//! A file that cannot be read or parsed is recorded and skipped. An entry that
//! cannot be decoded or persisted is recorded and skipped, and its partial
//! writes are reverted. Anything else (scan failure, failed commit, failed
//! revert) rolls back the open batch and aborts the run.
//!
//! Writes are committed every `batch_size` persisted entries, after every
//! file, and once more at the end, so a crash loses at most one batch.

use std::path::Path;

use clauson_common::{Error, Result};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::db::RecordStore;
use crate::models::{ImportError, RawEntry, RunStats};

use super::entry_transformer::{transform, TransformedEntry};
use super::file_scanner::FileScanner;
use super::occurrence::OccurrenceTable;

/// Default number of persisted entries per commit
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Import orchestrator service
pub struct ImportOrchestrator<S: RecordStore> {
    store: S,
    scanner: FileScanner,
    batch_size: usize,
}

impl<S: RecordStore> ImportOrchestrator<S> {
    /// Create new orchestrator. A batch size of 0 is treated as 1.
    pub fn new(store: S, scanner: FileScanner, batch_size: usize) -> Self {
        Self {
            store,
            scanner,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Import every dataset file under `source_directory`
    ///
    /// Returns the run report. Recovered file and entry errors are listed in
    /// it; only unrecoverable failures surface as `Err(Error::Unexpected)`,
    /// after the uncommitted batch has been rolled back.
    pub async fn run(&mut self, source_directory: &Path) -> Result<RunStats> {
        let mut stats = RunStats::new();
        let mut occurrences = OccurrenceTable::new();

        info!(source = %source_directory.display(), "Starting import run");

        match self.import_all(source_directory, &mut stats, &mut occurrences).await {
            Ok(()) => {
                stats.finish();
                info!(
                    files = stats.total_files,
                    entries = stats.total_entries,
                    variants = stats.total_variants,
                    errors = stats.errors.len(),
                    "Import run complete"
                );
                Ok(stats)
            }
            Err(e) => {
                error!(error = %e, entries = stats.total_entries, "Import run aborted");
                if let Err(rollback_err) = self.store.rollback().await {
                    warn!(error = %rollback_err, "Rollback after abort failed");
                }
                Err(match e {
                    Error::Unexpected(_) => e,
                    other => Error::Unexpected(other.to_string()),
                })
            }
        }
    }

    async fn import_all(
        &mut self,
        source_directory: &Path,
        stats: &mut RunStats,
        occurrences: &mut OccurrenceTable,
    ) -> Result<()> {
        let files = self
            .scanner
            .scan(source_directory)
            .map_err(|e| Error::Unexpected(e.to_string()))?;

        info!("Found {} dataset files", files.len());

        for path in &files {
            let label = file_label(path);

            let entries = match load_entries(path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(file = %label, error = %e, "Skipping file");
                    record_recoverable(stats, e)?;
                    continue;
                }
            };

            stats.total_files += 1;
            debug!(file = %label, entries = entries.len(), "Loading file");

            for (index, value) in entries.into_iter().enumerate() {
                self.import_entry(&label, index, value, stats, occurrences)
                    .await?;
            }

            self.store.commit().await?;
            debug!(file = %label, entries = stats.total_entries, "File committed");
        }

        self.store.commit().await?;
        Ok(())
    }

    /// Decode, transform and persist one entry
    ///
    /// Returns `Err` only for failures that must abort the run.
    async fn import_entry(
        &mut self,
        file: &str,
        index: usize,
        value: Value,
        stats: &mut RunStats,
        occurrences: &mut OccurrenceTable,
    ) -> Result<()> {
        let location = entry_label(&value, file, index);

        let raw: RawEntry = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(entry = %location, error = %e, "Skipping undecodable entry");
                return record_recoverable(stats, entry_error(location, &e));
            }
        };

        let Some(entry) = transform(&raw, occurrences) else {
            debug!(entry = %location, "Skipping entry with blank word");
            return Ok(());
        };

        if let Err(e) = self.store.begin_entry().await {
            warn!(word = %entry.record.word, error = %e, "Could not start entry");
            return record_recoverable(stats, entry_error(entry.record.word, &e));
        }

        match self.write_entry(&entry).await {
            Ok(variant_count) => {
                self.store.release_entry().await?;
                stats.total_entries += 1;
                stats.total_variants += variant_count;

                if stats.total_entries % self.batch_size == 0 {
                    self.store.commit().await?;
                    info!(entries = stats.total_entries, "Batch committed");
                }
            }
            Err(e) => {
                self.store.revert_entry().await?;
                warn!(word = %entry.record.word, error = %e, "Entry failed");
                record_recoverable(stats, entry_error(entry.record.word, &e))?;
            }
        }

        Ok(())
    }

    async fn write_entry(&mut self, entry: &TransformedEntry) -> Result<usize> {
        let word_id = self.store.insert_word(&entry.record).await?;
        for variant in &entry.variants {
            self.store.insert_variant(variant, word_id).await?;
        }
        Ok(entry.variants.len())
    }
}

/// Add a recoverable error to the report; any other error aborts the run
fn record_recoverable(stats: &mut RunStats, error: Error) -> Result<()> {
    if !error.is_recoverable() {
        return Err(error);
    }
    if let Some(report) = ImportError::from_recoverable(&error) {
        stats.record(report);
    }
    Ok(())
}

fn entry_error(word: String, cause: &dyn std::fmt::Display) -> Error {
    Error::EntryTransform {
        word,
        message: cause.to_string(),
    }
}

/// Read a dataset file as a JSON array of entry values
///
/// Unreadable and malformed files are both `Error::FileParse`.
pub(crate) fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileParse {
        file: file_label(path),
        message: format!("cannot read file: {}", e),
    })?;
    serde_json::from_str::<Vec<Value>>(&content).map_err(|e| Error::FileParse {
        file: file_label(path),
        message: format!("JSON parse error: {}", e),
    })
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Best available name for an entry in error messages
///
/// The `word` value when it is a non-blank string, its JSON text when it is
/// some other non-null value, otherwise `<file>#<index>`.
fn entry_label(value: &Value, file: &str, index: usize) -> String {
    match value.get("word") {
        Some(Value::String(word)) if !word.trim().is_empty() => word.trim().to_string(),
        Some(Value::Null) | None => format!("{}#{}", file, index),
        Some(Value::String(_)) => format!("{}#{}", file, index),
        Some(other) => other.to_string(),
    }
}
