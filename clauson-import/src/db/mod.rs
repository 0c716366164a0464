//! Record store for the import pipeline
//!
//! `RecordStore` is the seam between the orchestrator and persistence.
//! `SqliteStore` keeps one open transaction that accumulates writes until
//! `commit`; the next write opens a fresh one.

pub mod words;

use async_trait::async_trait;
use clauson_common::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::{NormalizedRecord, VariantRecord};

/// Keyed record store consumed by the import orchestrator
#[async_trait]
pub trait RecordStore: Send {
    /// Insert a word record and return its generated id
    async fn insert_word(&mut self, record: &NormalizedRecord) -> Result<i64>;

    /// Insert a variant owned by `word_id`
    async fn insert_variant(&mut self, variant: &VariantRecord, word_id: i64) -> Result<()>;

    /// Delete every record and restart id generation
    async fn clear(&mut self) -> Result<()>;

    /// Mark the start of one entry's writes
    async fn begin_entry(&mut self) -> Result<()>;

    /// Keep the writes made since `begin_entry`
    async fn release_entry(&mut self) -> Result<()>;

    /// Undo the writes made since `begin_entry`
    async fn revert_entry(&mut self) -> Result<()>;

    /// Durability boundary for everything written so far
    async fn commit(&mut self) -> Result<()>;

    /// Discard everything written since the last commit
    async fn rollback(&mut self) -> Result<()>;
}

/// SQLite-backed record store
pub struct SqliteStore {
    pool: SqlitePool,
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteStore {
    /// Create new store over an initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, tx: None }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// True while uncommitted writes may be pending
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Sqlite>> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_word(&mut self, record: &NormalizedRecord) -> Result<i64> {
        let keywords = serde_json::to_string(&record.search_keywords)?;
        let tx = self.transaction().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO words (
                word, word_normalized, search_keywords, meaning, etymology_type,
                cross_reference, full_entry_text, occurrence_number
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.word)
        .bind(&record.word_normalized)
        .bind(&keywords)
        .bind(&record.meaning)
        .bind(&record.etymology_type)
        .bind(&record.cross_reference)
        .bind(&record.full_entry_text)
        .bind(i64::from(record.occurrence_number))
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_variant(&mut self, variant: &VariantRecord, word_id: i64) -> Result<()> {
        let tx = self.transaction().await?;

        sqlx::query(
            r#"
            INSERT INTO variants (word_id, variant, variant_normalized)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(word_id)
        .bind(&variant.variant)
        .bind(&variant.variant_normalized)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        let tx = self.transaction().await?;

        sqlx::query("DELETE FROM variants").execute(&mut **tx).await?;
        sqlx::query("DELETE FROM words").execute(&mut **tx).await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('words', 'variants')")
            .execute(&mut **tx)
            .await?;

        tracing::info!("Cleared words and variants");
        Ok(())
    }

    async fn begin_entry(&mut self) -> Result<()> {
        let tx = self.transaction().await?;
        sqlx::query("SAVEPOINT entry").execute(&mut **tx).await?;
        Ok(())
    }

    async fn release_entry(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.as_mut() {
            sqlx::query("RELEASE SAVEPOINT entry").execute(&mut **tx).await?;
        }
        Ok(())
    }

    async fn revert_entry(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.as_mut() {
            sqlx::query("ROLLBACK TO SAVEPOINT entry").execute(&mut **tx).await?;
            sqlx::query("RELEASE SAVEPOINT entry").execute(&mut **tx).await?;
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}
