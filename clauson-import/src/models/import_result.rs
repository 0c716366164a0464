//! Import run results and recovered errors
//!
//! File-level and entry-level failures never abort a run; they are collected
//! here with enough context (file name or word) to fix the source data.

use chrono::{DateTime, Utc};
use clauson_common::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a recovered error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorScope {
    /// Whole file skipped, import continues with the next file
    File,
    /// Single entry skipped, import continues with the next entry
    Entry,
}

/// Recovered import error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    pub scope: ErrorScope,
    /// File name for file errors, the offending word for entry errors
    pub location: String,
    pub message: String,
}

impl ImportError {
    pub fn file(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: ErrorScope::File,
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn entry(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: ErrorScope::Entry,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl ImportError {
    /// Report entry for a recoverable error, `None` for errors that abort a run
    pub fn from_recoverable(error: &Error) -> Option<Self> {
        match error {
            Error::FileParse { file, message } => Some(Self::file(file.clone(), message.clone())),
            Error::EntryTransform { word, message } => Some(Self::entry(word.clone(), message.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            ErrorScope::File => "File",
            ErrorScope::Entry => "Entry",
        };
        write!(f, "{} error ({}): {}", scope, self.location, self.message)
    }
}

/// Totals and error list for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Files parsed successfully
    pub total_files: usize,
    /// Records persisted
    pub total_entries: usize,
    /// Variant rows persisted
    pub total_variants: usize,
    /// Recovered errors in the order they occurred
    pub errors: Vec<ImportError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Create new empty stats stamped with the current time
    pub fn new() -> Self {
        Self {
            total_files: 0,
            total_entries: 0,
            total_variants: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, error: ImportError) {
        self.errors.push(error);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_seconds())
            .unwrap_or(0)
    }

    pub fn file_error_count(&self) -> usize {
        self.count_by_scope(ErrorScope::File)
    }

    pub fn entry_error_count(&self) -> usize {
        self.count_by_scope(ErrorScope::Entry)
    }

    fn count_by_scope(&self, scope: ErrorScope) -> usize {
        self.errors.iter().filter(|e| e.scope == scope).count()
    }

    /// Human-readable report, listing at most `max_errors` errors
    pub fn report_lines(&self, max_errors: usize) -> Vec<String> {
        let mut lines = vec![
            format!("Files: {}", self.total_files),
            format!("Entries: {}", self.total_entries),
            format!("Variants: {}", self.total_variants),
        ];

        if !self.errors.is_empty() {
            lines.push(format!("{} errors occurred:", self.errors.len()));
            for error in self.errors.iter().take(max_errors) {
                lines.push(format!("  - {}", error));
            }
            if self.errors.len() > max_errors {
                lines.push(format!("  ... and {} more", self.errors.len() - max_errors));
            }
        }

        lines
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
