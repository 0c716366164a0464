//! Search keyword extraction for multi-form headwords
//!
//! "ötenç/1 ötünç" → ["ötenç", "ötünç"] (normalized)

use super::normalizer::normalize;

/// Split a headword on `/` and normalize each form
///
/// Blank keys are dropped and duplicates keep their first position.
pub fn extract_keywords(word: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for part in word.split('/') {
        let key = normalize(part.trim());
        if !key.is_empty() && !keywords.contains(&key) {
            keywords.push(key);
        }
    }

    keywords
}
