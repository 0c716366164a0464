//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the dictionary schema.
//! Schema application is idempotent; `reset_schema` is the destructive variant
//! used before a clean re-import.

use crate::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Tables owned by the dictionary schema, children first
pub const SCHEMA_TABLES: [&str; 2] = ["variants", "words"];

/// Initialize database connection and create tables if needed
///
/// Any failure to reach the database file is reported as `Error::Connection`.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Connection(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&db_url)
        .await
        .map_err(|e| Error::Connection(format!("{}: {}", db_path.display(), e)))?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    apply_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes that do not exist yet
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    create_words_table(pool).await?;
    create_variants_table(pool).await?;
    create_indexes(pool).await?;
    Ok(())
}

/// Drop every dictionary table and re-apply the schema
pub async fn reset_schema(pool: &SqlitePool) -> Result<()> {
    for table in SCHEMA_TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    info!("Dropped tables: {}", SCHEMA_TABLES.join(", "));

    apply_schema(pool).await?;
    info!("Schema re-applied");
    Ok(())
}

/// Count indexes defined on the dictionary tables
pub async fn count_indexes(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND tbl_name IN ('words', 'variants')",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

async fn create_words_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            word_normalized TEXT NOT NULL,
            search_keywords TEXT NOT NULL DEFAULT '[]',
            meaning TEXT NOT NULL DEFAULT '',
            etymology_type TEXT NOT NULL DEFAULT '',
            cross_reference TEXT NOT NULL DEFAULT '',
            full_entry_text TEXT NOT NULL DEFAULT '',
            occurrence_number INTEGER NOT NULL CHECK (occurrence_number > 0),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_variants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS variants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            variant TEXT NOT NULL,
            variant_normalized TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "CREATE INDEX IF NOT EXISTS idx_words_word_normalized ON words(word_normalized)",
        "CREATE INDEX IF NOT EXISTS idx_words_word ON words(word)",
        "CREATE INDEX IF NOT EXISTS idx_variants_word_id ON variants(word_id)",
        "CREATE INDEX IF NOT EXISTS idx_variants_variant_normalized ON variants(variant_normalized)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
