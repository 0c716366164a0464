//! Read-only checks over an imported dictionary
//!
//! Collects sample rows for the `verify` command: stored keys compared with
//! freshly computed ones, rows sharing a probe key, expanded etymology labels
//! and exact-key lookups. Ranked fuzzy search is not performed here.

use clauson_common::Result;
use sqlx::SqlitePool;

use crate::db::words::{find_by_key, words_containing, words_with_etymology, KeyMatch, MatchKind};

use super::entry_transformer::primary_form;
use super::keywords::extract_keywords;
use super::normalizer::normalize;

/// Spellings exercising prefix stripping, punctuation and phonetic folding
pub const NORMALIZATION_SAMPLES: [&str; 7] = ["1 a:ğ-", "2 a:ğ-", "ḏamat", "öçe:-", "1 ö:ç", "ñ", "ŋ"];

/// Fragments used to pull stored rows for the samples above
const STORED_FRAGMENTS: [&str; 4] = ["a:ğ-", "ḏamat", "öçe:-", "ö:ç"];

const ETYMOLOGY_FRAGMENTS: [&str; 2] = ["Derived", "Verbum Unicum"];

/// Lookup probes; each is normalized before lookup
pub const LOOKUP_TERMS: [&str; 4] = ["ağ", "damat", "ötenç", "ötünç"];

/// Stored row compared against a fresh computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSample {
    pub word: String,
    pub stored_key: String,
    pub recomputed_key: String,
    pub stored_keywords: Vec<String>,
    pub recomputed_keywords: Vec<String>,
}

impl StoredSample {
    pub fn is_consistent(&self) -> bool {
        self.stored_key == self.recomputed_key && self.stored_keywords == self.recomputed_keywords
    }
}

/// Lookup of one probe term
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub term: String,
    pub key: String,
    pub matches: Vec<KeyMatch>,
}

#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    /// (sample, computed key)
    pub normalization: Vec<(String, String)>,
    pub stored: Vec<StoredSample>,
    /// (word, word_normalized) rows sharing the first lookup key
    pub same_key: Vec<(String, String)>,
    /// (word, etymology label)
    pub etymology: Vec<(String, String)>,
    pub lookups: Vec<LookupResult>,
}

impl VerificationReport {
    /// Stored rows whose keys no longer match the current rules
    pub fn inconsistent_count(&self) -> usize {
        self.stored.iter().filter(|s| !s.is_consistent()).count()
    }
}

/// Collect the verification report
pub async fn verify(pool: &SqlitePool) -> Result<VerificationReport> {
    let mut report = VerificationReport {
        normalization: NORMALIZATION_SAMPLES
            .iter()
            .map(|s| (s.to_string(), normalize(s)))
            .collect(),
        ..VerificationReport::default()
    };

    for fragment in STORED_FRAGMENTS {
        for (word, stored_key, stored_keywords) in words_containing(pool, fragment, 10).await? {
            report.stored.push(StoredSample {
                recomputed_key: normalize(primary_form(&word)),
                recomputed_keywords: extract_keywords(&word),
                word,
                stored_key,
                stored_keywords,
            });
        }
    }

    let probe_key = normalize(LOOKUP_TERMS[0]);
    report.same_key = find_by_key(pool, &probe_key, 20)
        .await?
        .into_iter()
        .filter(|m| m.kind == MatchKind::Normalized)
        .map(|m| (m.word, probe_key.clone()))
        .collect();

    for fragment in ETYMOLOGY_FRAGMENTS {
        report
            .etymology
            .extend(words_with_etymology(pool, fragment, 5).await?);
    }

    for term in LOOKUP_TERMS {
        let key = normalize(term);
        let matches = find_by_key(pool, &key, 3).await?;
        report.lookups.push(LookupResult {
            term: term.to_string(),
            key,
            matches,
        });
    }

    tracing::debug!(
        stored = report.stored.len(),
        inconsistent = report.inconsistent_count(),
        "Verification collected"
    );

    Ok(report)
}
