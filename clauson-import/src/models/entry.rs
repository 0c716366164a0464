//! Dictionary entry shapes: raw input and normalized output

use serde::{Deserialize, Serialize};

/// One lexical entry as it appears in a dataset file
///
/// Every field is optional on the wire; `null` is treated like an absent field.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    /// Headword, possibly with a leading numeral ("1 ağ") and `/`-joined alternates
    pub word: Option<String>,
    /// Short etymology code ("D", "VU", "?D", ...)
    pub etymology_type: Option<String>,
    pub meaning: Option<String>,
    pub cross_reference: Option<String>,
    pub full_entry_text: Option<String>,
    /// Declared spelling variants; `null` members are skipped
    pub variants: Option<Vec<Option<String>>>,
}

impl RawEntry {
    /// Convenience constructor for an entry with only a headword
    pub fn with_word(word: impl Into<String>) -> Self {
        Self {
            word: Some(word.into()),
            ..Self::default()
        }
    }
}

/// Normalized, searchable record derived from one `RawEntry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// Headword as it appeared in the source (trimmed)
    pub word: String,
    /// Canonical sort/search key of the primary spelling
    pub word_normalized: String,
    /// Distinct normalized keys of every `/`-separated form, first-seen order
    pub search_keywords: Vec<String>,
    pub meaning: String,
    /// Expanded etymology label
    pub etymology_type: String,
    pub cross_reference: String,
    pub full_entry_text: String,
    /// 1-based position among entries sharing the same base word
    pub occurrence_number: u32,
}

/// Declared spelling variant paired with its normalized key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    pub variant: String,
    pub variant_normalized: String,
}
