//! Tests for database initialization and schema reset

use clauson_common::db::init::{count_indexes, init_database, reset_schema};
use clauson_common::Error;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("clauson.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("clauson.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_schema_tables_and_indexes_exist() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("clauson.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('words', 'variants') ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(tables, vec!["variants".to_string(), "words".to_string()]);

    assert_eq!(count_indexes(&pool).await.unwrap(), 4);
}

#[tokio::test]
async fn test_reset_schema_drops_rows() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("clauson.db")).await.unwrap();

    sqlx::query(
        "INSERT INTO words (word, word_normalized, occurrence_number) VALUES ('ağ', 'ağ', 1)",
    )
    .execute(&pool)
    .await
    .unwrap();

    reset_schema(&pool).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(count_indexes(&pool).await.unwrap(), 4);
}

#[tokio::test]
async fn test_occurrence_number_must_be_positive() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("clauson.db")).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO words (word, word_normalized, occurrence_number) VALUES ('ağ', 'ağ', 0)",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "occurrence_number 0 should violate CHECK constraint");
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreachable_location_is_connection_error() {
    // A regular file cannot act as a parent directory
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();

    let result = init_database(&blocker.join("clauson.db")).await;

    match result {
        Err(Error::Connection(_)) => {}
        other => panic!("Expected Connection error, got {:?}", other.map(|_| ())),
    }
}
