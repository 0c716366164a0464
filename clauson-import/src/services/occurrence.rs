//! Occurrence numbering for repeated headwords
//!
//! The dictionary lists homographs as "1 olug", "2 olug", ... The table
//! counts entries per base word (the literal spelling minus any leading
//! numeral) so each gets its position in traversal order. No diacritic or
//! punctuation folding is applied to the base word.

use std::collections::HashMap;

use super::normalizer::strip_numeral_prefix;

/// Run-scoped base word → count table
///
/// Owned by a single import run; construct a fresh table per run or test.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceTable {
    counts: HashMap<String, u32>,
}

impl OccurrenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count recorded so far for a base word
    pub fn count(&self, base_word: &str) -> u32 {
        self.counts.get(base_word).copied().unwrap_or(0)
    }

    /// Number of distinct base words seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Forget every count (start of a new run)
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

/// Base word used for grouping: leading numeral stripped, then trimmed
pub fn base_word(word: &str) -> &str {
    strip_numeral_prefix(word).trim()
}

/// Advance and return the occurrence number for `word`, starting at 1
pub fn next_occurrence(word: &str, table: &mut OccurrenceTable) -> u32 {
    let counter = table.counts.entry(base_word(word).to_string()).or_insert(0);
    *counter += 1;
    *counter
}
