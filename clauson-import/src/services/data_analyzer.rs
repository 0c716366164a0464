//! Dataset character and etymology survey
//!
//! Reads the dataset files without touching the store. Used to discover
//! characters the normalizer may need to fold and etymology codes the
//! expander does not know.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use clauson_common::{Error, Result};
use serde_json::Value;
use tracing::warn;

use super::file_scanner::FileScanner;
use super::import_orchestrator::{file_label, load_entries};

/// Character and etymology counts over a dataset directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetAnalysis {
    pub files_read: usize,
    /// (file, reason) for files that could not be read
    pub skipped_files: Vec<(String, String)>,
    /// Every character seen in a `word` field, in code point order
    pub characters: BTreeMap<char, usize>,
    etymology_counts: HashMap<String, usize>,
}

impl DatasetAnalysis {
    /// Etymology codes, most common first (ties by code)
    pub fn etymology_codes(&self) -> Vec<(&str, usize)> {
        let mut codes: Vec<(&str, usize)> = self
            .etymology_counts
            .iter()
            .map(|(code, count)| (code.as_str(), *count))
            .collect();
        codes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        codes
    }

    fn add_entry(&mut self, entry: &Value) {
        if let Some(Value::String(word)) = entry.get("word") {
            for c in word.chars() {
                *self.characters.entry(c).or_default() += 1;
            }
        }
        if let Some(Value::String(code)) = entry.get("etymology_type") {
            if !code.is_empty() {
                *self.etymology_counts.entry(code.clone()).or_default() += 1;
            }
        }
    }
}

/// `'ğ': 12 (U+011F)`
pub fn format_character(c: char, count: usize) -> String {
    format!("'{}': {} (U+{:04X})", c, count, c as u32)
}

/// Survey every dataset file under `data_dir`
///
/// Unreadable or malformed files are logged and listed in
/// `skipped_files`; a missing directory is an error.
pub fn analyze_dataset(data_dir: &Path, extension: &str) -> Result<DatasetAnalysis> {
    let files = FileScanner::new(extension)
        .scan(data_dir)
        .map_err(|e| Error::InvalidInput(e.to_string()))?;

    let mut analysis = DatasetAnalysis::default();

    for path in &files {
        match load_entries(path) {
            Ok(entries) => {
                analysis.files_read += 1;
                entries.iter().for_each(|entry| analysis.add_entry(entry));
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable file");
                let reason = match e {
                    Error::FileParse { message, .. } => message,
                    other => other.to_string(),
                };
                analysis.skipped_files.push((file_label(path), reason));
            }
        }
    }

    Ok(analysis)
}
