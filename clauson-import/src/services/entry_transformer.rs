//! Raw entry → normalized record
//!
//! Composes the normalizer, keyword extractor, etymology expander and
//! occurrence counter. Pure apart from the occurrence table passed in.

use crate::models::{NormalizedRecord, RawEntry, VariantRecord};

use super::etymology::expand;
use super::keywords::extract_keywords;
use super::normalizer::normalize;
use super::occurrence::{next_occurrence, OccurrenceTable};

/// Record plus its declared variants, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedEntry {
    pub record: NormalizedRecord,
    pub variants: Vec<VariantRecord>,
}

/// Headword spelling before the first `/`
pub fn primary_form(word: &str) -> &str {
    word.split('/').next().unwrap_or(word).trim()
}

/// Transform one raw entry
///
/// Returns `None` when the headword is missing or blank; the occurrence
/// table is left untouched in that case.
///
/// **Algorithm:**
/// 1. Trim the headword; skip if blank
/// 2. Occurrence number from the full headword (alternates included)
/// 3. `word_normalized` from the part before the first `/`
/// 4. `search_keywords` from every `/`-separated part
/// 5. Expand the etymology code, pass text fields through
/// 6. One variant per non-blank declared variant
pub fn transform(raw: &RawEntry, table: &mut OccurrenceTable) -> Option<TransformedEntry> {
    let word = raw.word.as_deref().unwrap_or_default().trim();
    if word.is_empty() {
        return None;
    }

    let occurrence_number = next_occurrence(word, table);

    let record = NormalizedRecord {
        word: word.to_string(),
        word_normalized: normalize(primary_form(word)),
        search_keywords: extract_keywords(word),
        meaning: raw.meaning.clone().unwrap_or_default(),
        etymology_type: expand(raw.etymology_type.as_deref().unwrap_or_default()),
        cross_reference: raw.cross_reference.clone().unwrap_or_default(),
        full_entry_text: raw.full_entry_text.clone().unwrap_or_default(),
        occurrence_number,
    };

    let variants = raw
        .variants
        .iter()
        .flatten()
        .flatten()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| VariantRecord {
            variant: v.to_string(),
            variant_normalized: normalize(v),
        })
        .collect();

    Some(TransformedEntry { record, variants })
}
