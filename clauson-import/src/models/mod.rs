//! Data models for the import pipeline

pub mod entry;
pub mod import_result;

pub use entry::{NormalizedRecord, RawEntry, VariantRecord};
pub use import_result::{ErrorScope, ImportError, RunStats};
