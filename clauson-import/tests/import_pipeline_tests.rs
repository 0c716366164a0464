//! End-to-end import tests against a real SQLite store

use std::fs;
use std::path::Path;

use clauson_common::db::init_database;
use clauson_import::db::words::{
    dictionary_statistics, etymology_distribution, find_by_key, load_all_words, most_repeated_words, MatchKind,
};
use clauson_import::models::ErrorScope;
use clauson_import::services::{export_to_json, verify};
use clauson_import::{FileScanner, ImportOrchestrator, RecordStore, RunStats, SqliteStore};
use serde_json::json;
use sqlx::SqlitePool;
use tempfile::TempDir;

fn write_dataset(dir: &Path) {
    fs::write(
        dir.join("a.json"),
        json!([
            {"word": "1 a:ğ-", "etymology_type": "D", "meaning": "to rise", "variants": ["a:ğ", null, " "]},
            {"word": "2 a:ğ-", "etymology_type": "XYZ", "meaning": "to climb"},
            {"word": "   ", "etymology_type": "D"},
            {"word": "ḏamat/damat", "etymology_type": "?F", "meaning": "son-in-law"},
        ])
        .to_string(),
    )
    .unwrap();
    fs::write(dir.join("b_broken.json"), "[{\"word\": ").unwrap();
    fs::write(
        dir.join("c.json"),
        json!([{"word": "ağ", "etymology_type": "VU", "full_entry_text": "ağ VU net"}]).to_string(),
    )
    .unwrap();
}

async fn setup() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("Datas");
    fs::create_dir(&data_dir).unwrap();
    write_dataset(&data_dir);

    let pool = init_database(&temp_dir.path().join("clauson.db")).await.unwrap();
    (temp_dir, pool)
}

async fn import(pool: &SqlitePool, data_dir: &Path, batch_size: usize) -> RunStats {
    let mut store = SqliteStore::new(pool.clone());
    store.clear().await.unwrap();
    store.commit().await.unwrap();

    let mut orchestrator = ImportOrchestrator::new(store, FileScanner::default(), batch_size);
    let stats = orchestrator.run(data_dir).await.unwrap();
    assert!(!orchestrator.store().in_transaction());
    stats
}

#[tokio::test]
async fn test_import_run_report() {
    let (temp_dir, pool) = setup().await;
    let stats = import(&pool, &temp_dir.path().join("Datas"), 2).await;

    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.total_variants, 1);
    assert_eq!(stats.file_error_count(), 1);
    assert_eq!(stats.entry_error_count(), 0);
    assert_eq!(stats.errors[0].scope, ErrorScope::File);
    assert_eq!(stats.errors[0].location, "b_broken.json");
}

#[tokio::test]
async fn test_imported_records() {
    let (temp_dir, pool) = setup().await;
    import(&pool, &temp_dir.path().join("Datas"), 100).await;

    let words = load_all_words(&pool).await.unwrap();
    let summary: Vec<(&str, &str, i64, &str)> = words
        .iter()
        .map(|w| {
            (
                w.word.as_str(),
                w.word_normalized.as_str(),
                w.occurrence_number,
                w.etymology_type.as_str(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("1 a:ğ-", "ağ", 1, "Derived"),
            ("2 a:ğ-", "ağ", 2, "XYZ"),
            ("ağ", "ağ", 1, "Verbum Unicum"),
            ("ḏamat/damat", "damat", 1, "Foreign Loan Word?"),
        ]
    );

    assert_eq!(words[0].variants, vec!["a:ğ"]);
    assert_eq!(words[0].search_keywords, vec!["ağ"]);
    assert_eq!(words[3].search_keywords, vec!["damat"]);
    assert_eq!(words[2].full_entry_text, "ağ VU net");
    assert_eq!(words[1].meaning, "to climb");
}

#[tokio::test]
async fn test_reimport_is_deterministic() {
    let (temp_dir, pool) = setup().await;
    let data_dir = temp_dir.path().join("Datas");

    import(&pool, &data_dir, 1).await;
    let first = load_all_words(&pool).await.unwrap();

    import(&pool, &data_dir, 3).await;
    let second = load_all_words(&pool).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_variant_reverts_whole_entry() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("Datas");
    fs::create_dir(&data_dir).unwrap();
    fs::write(
        data_dir.join("a.json"),
        json!([
            {"word": "ot", "variants": ["o:t", "boom"]},
            {"word": "yer", "variants": ["ye:r"]},
        ])
        .to_string(),
    )
    .unwrap();

    let pool = init_database(&temp_dir.path().join("clauson.db")).await.unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER reject_boom BEFORE INSERT ON variants
        WHEN NEW.variant = 'boom'
        BEGIN
            SELECT RAISE(ABORT, 'variant rejected');
        END
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let stats = import(&pool, &data_dir, 100).await;

    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.entry_error_count(), 1);
    assert_eq!(stats.errors[0].location, "ot");
    assert!(stats.errors[0].message.contains("variant rejected"));

    let words = load_all_words(&pool).await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].word, "yer");
    assert_eq!(words[0].variants, vec!["ye:r"]);

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM variants WHERE variant = 'o:t'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_statistics() {
    let (temp_dir, pool) = setup().await;
    import(&pool, &temp_dir.path().join("Datas"), 100).await;

    let stats = dictionary_statistics(&pool).await.unwrap();
    assert_eq!(stats.unique_words, 2);
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.etymology_types, 4);
    assert_eq!(stats.repeated_words, 1);
    assert_eq!(stats.total_variants, 1);

    assert_eq!(
        most_repeated_words(&pool, 5).await.unwrap(),
        vec![("ağ".to_string(), 2)]
    );

    let labels: Vec<String> = etymology_distribution(&pool, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(
        labels,
        vec!["Derived", "Foreign Loan Word?", "Verbum Unicum", "XYZ"]
    );
}

#[tokio::test]
async fn test_key_lookup() {
    let (temp_dir, pool) = setup().await;
    import(&pool, &temp_dir.path().join("Datas"), 100).await;

    let matches = find_by_key(&pool, "ağ", 10).await.unwrap();
    let words: Vec<&str> = matches.iter().map(|m| m.word.as_str()).collect();
    assert_eq!(words, vec!["1 a:ğ-", "ağ", "2 a:ğ-"]);
    assert!(matches.iter().all(|m| m.kind == MatchKind::Normalized));

    let matches = find_by_key(&pool, "damat", 10).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].meaning, "son-in-law");

    assert!(find_by_key(&pool, "yok", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export() {
    let (temp_dir, pool) = setup().await;
    import(&pool, &temp_dir.path().join("Datas"), 100).await;

    let output = temp_dir.path().join("public").join("dictionary_data.json");
    let count = export_to_json(&pool, &output).await.unwrap();
    assert_eq!(count, 4);

    let exported: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported.len(), 4);
    assert_eq!(exported[0]["word"], "1 a:ğ-");
    assert_eq!(exported[0]["variants"], json!(["a:ğ"]));
    assert_eq!(exported[0]["search_keywords"], json!(["ağ"]));
    assert_eq!(exported[3]["word_normalized"], "damat");
    assert!(!output.with_file_name("dictionary_data.json.tmp").exists());
}

#[tokio::test]
async fn test_verify_report() {
    let (temp_dir, pool) = setup().await;
    import(&pool, &temp_dir.path().join("Datas"), 100).await;

    let report = verify(&pool).await.unwrap();

    assert_eq!(report.normalization[0], ("1 a:ğ-".to_string(), "ağ".to_string()));
    assert!(report.stored.len() >= 3);
    assert_eq!(report.inconsistent_count(), 0);
    assert_eq!(report.same_key.len(), 3);
    assert!(report
        .etymology
        .contains(&("ağ".to_string(), "Verbum Unicum".to_string())));
    assert_eq!(report.lookups[0].matches.len(), 3);
    assert_eq!(report.lookups[1].key, "damat");
    assert_eq!(report.lookups[1].matches.len(), 1);
}
