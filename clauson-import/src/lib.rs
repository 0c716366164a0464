//! clauson-import library interface
//!
//! Import pipeline for the Clauson etymological dictionary dataset: turns raw
//! JSON entries into normalized, searchable records in SQLite. Exposed as a
//! library for the binary and for integration testing.

pub mod db;
pub mod models;
pub mod services;

pub use db::{RecordStore, SqliteStore};
pub use models::{ImportError, NormalizedRecord, RawEntry, RunStats, VariantRecord};
pub use services::{FileScanner, ImportOrchestrator};
