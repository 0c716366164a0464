//! Import pipeline services
//!
//! Pure transformation rules (normalizer, etymology, keywords, occurrence,
//! entry transformer) plus the I/O-bound orchestrator, scanner and the
//! export/verify/analyze tools.

pub mod data_analyzer;
pub mod entry_transformer;
pub mod etymology;
pub mod exporter;
pub mod file_scanner;
pub mod import_orchestrator;
pub mod keywords;
pub mod normalizer;
pub mod occurrence;
pub mod verifier;

pub use data_analyzer::{analyze_dataset, DatasetAnalysis};
pub use entry_transformer::{transform, TransformedEntry};
pub use etymology::expand;
pub use exporter::export_to_json;
pub use file_scanner::{FileScanner, ScanError};
pub use import_orchestrator::{ImportOrchestrator, DEFAULT_BATCH_SIZE};
pub use keywords::extract_keywords;
pub use normalizer::normalize;
pub use occurrence::{next_occurrence, OccurrenceTable};
pub use verifier::{verify, VerificationReport};
