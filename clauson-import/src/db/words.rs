//! Read-side queries over imported words and variants
//!
//! Used by the report, export and verify commands. Never writes.

use clauson_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

/// Stored word with its variants, as exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredWord {
    pub id: i64,
    pub word: String,
    pub word_normalized: String,
    pub search_keywords: Vec<String>,
    pub meaning: String,
    pub etymology_type: String,
    pub occurrence_number: i64,
    pub full_entry_text: String,
    pub variants: Vec<String>,
}

/// Aggregate counts over the whole dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryStatistics {
    pub unique_words: i64,
    pub total_entries: i64,
    pub etymology_types: i64,
    pub repeated_words: i64,
    pub total_variants: i64,
}

/// How a lookup key matched a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Normalized,
    Keyword,
    Variant,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Normalized => "normalized",
            MatchKind::Keyword => "keyword",
            MatchKind::Variant => "variant",
        }
    }
}

/// One exact-key lookup hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub occurrence_number: i64,
    pub kind: MatchKind,
}

fn parse_keywords(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

/// Load every word with its variants, ordered by `word_normalized, word`
pub async fn load_all_words(pool: &SqlitePool) -> Result<Vec<StoredWord>> {
    let variant_rows = sqlx::query("SELECT word_id, variant FROM variants ORDER BY word_id, id")
        .fetch_all(pool)
        .await?;

    let mut variants: HashMap<i64, Vec<String>> = HashMap::new();
    for row in variant_rows {
        variants
            .entry(row.get("word_id"))
            .or_default()
            .push(row.get("variant"));
    }

    let rows = sqlx::query(
        r#"
        SELECT id, word, word_normalized, search_keywords, meaning,
               etymology_type, occurrence_number, full_entry_text
        FROM words
        ORDER BY word_normalized, word, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut words = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.get("id");
        let keywords: String = row.get("search_keywords");
        words.push(StoredWord {
            id,
            word: row.get("word"),
            word_normalized: row.get("word_normalized"),
            search_keywords: parse_keywords(&keywords)?,
            meaning: row.get("meaning"),
            etymology_type: row.get("etymology_type"),
            occurrence_number: row.get("occurrence_number"),
            full_entry_text: row.get("full_entry_text"),
            variants: variants.remove(&id).unwrap_or_default(),
        });
    }

    Ok(words)
}

/// Aggregate counts for the statistics printout
pub async fn dictionary_statistics(pool: &SqlitePool) -> Result<DictionaryStatistics> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(DISTINCT word_normalized) AS unique_words,
            COUNT(*) AS total_entries,
            COUNT(DISTINCT NULLIF(etymology_type, '')) AS etymology_types,
            COUNT(DISTINCT CASE WHEN occurrence_number > 1 THEN word_normalized END) AS repeated_words
        FROM words
        "#,
    )
    .fetch_one(pool)
    .await?;

    let total_variants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM variants")
        .fetch_one(pool)
        .await?;

    Ok(DictionaryStatistics {
        unique_words: row.get("unique_words"),
        total_entries: row.get("total_entries"),
        etymology_types: row.get("etymology_types"),
        repeated_words: row.get("repeated_words"),
        total_variants,
    })
}

/// Etymology label → entry count, most common first
pub async fn etymology_distribution(pool: &SqlitePool, limit: i64) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT etymology_type, COUNT(*) AS count
        FROM words
        GROUP BY etymology_type
        ORDER BY count DESC, etymology_type
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Normalized key → highest occurrence number, for keys seen more than once
pub async fn most_repeated_words(pool: &SqlitePool, limit: i64) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT word_normalized, MAX(occurrence_number) AS max_occurrence
        FROM words
        GROUP BY word_normalized
        HAVING MAX(occurrence_number) > 1
        ORDER BY max_occurrence DESC, word_normalized
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `(word, word_normalized, search_keywords)` for words containing `fragment`
pub async fn words_containing(
    pool: &SqlitePool,
    fragment: &str,
    limit: i64,
) -> Result<Vec<(String, String, Vec<String>)>> {
    let rows = sqlx::query(
        r#"
        SELECT word, word_normalized, search_keywords
        FROM words
        WHERE instr(word, ?) > 0
        ORDER BY id
        LIMIT ?
        "#,
    )
    .bind(fragment)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let keywords: String = row.get("search_keywords");
        out.push((row.get("word"), row.get("word_normalized"), parse_keywords(&keywords)?));
    }
    Ok(out)
}

/// `(word, etymology_type)` for labels containing `fragment`
pub async fn words_with_etymology(
    pool: &SqlitePool,
    fragment: &str,
    limit: i64,
) -> Result<Vec<(String, String)>> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT word, etymology_type
        FROM words
        WHERE instr(etymology_type, ?) > 0
        ORDER BY id
        LIMIT ?
        "#,
    )
    .bind(fragment)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Exact lookup of a normalized key against words, keywords and variants
///
/// A word matched several ways is reported once, with the strongest kind
/// (normalized, then keyword, then variant).
pub async fn find_by_key(pool: &SqlitePool, key: &str, limit: i64) -> Result<Vec<KeyMatch>> {
    let rows = sqlx::query(
        r#"
        SELECT id, word, meaning, occurrence_number, MIN(rank) AS rank
        FROM (
            SELECT w.id, w.word, w.meaning, w.occurrence_number, 0 AS rank
            FROM words w
            WHERE w.word_normalized = ?1
            UNION ALL
            SELECT w.id, w.word, w.meaning, w.occurrence_number, 1 AS rank
            FROM words w, json_each(w.search_keywords) k
            WHERE k.value = ?1
            UNION ALL
            SELECT w.id, w.word, w.meaning, w.occurrence_number, 2 AS rank
            FROM words w
            JOIN variants v ON v.word_id = w.id
            WHERE v.variant_normalized = ?1
        )
        GROUP BY id
        ORDER BY rank, occurrence_number, id
        LIMIT ?2
        "#,
    )
    .bind(key)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let rank: i64 = row.get("rank");
            KeyMatch {
                id: row.get("id"),
                word: row.get("word"),
                meaning: row.get("meaning"),
                occurrence_number: row.get("occurrence_number"),
                kind: match rank {
                    0 => MatchKind::Normalized,
                    1 => MatchKind::Keyword,
                    _ => MatchKind::Variant,
                },
            }
        })
        .collect())
}
