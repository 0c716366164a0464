//! Dictionary export to a single JSON file
//!
//! Writes every stored word (with variants) ordered by normalized key as a
//! compact JSON array, for static front-ends that load the whole dictionary.

use std::path::{Path, PathBuf};

use clauson_common::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::words::load_all_words;

/// Export all words to `output_path`, returning the record count
///
/// The file is written to a temporary sibling first and renamed into place,
/// so readers never observe a half-written export.
pub async fn export_to_json(pool: &SqlitePool, output_path: &Path) -> Result<usize> {
    let words = load_all_words(pool).await?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let payload = serde_json::to_vec(&words)?;
    let temp_path = temp_path_for(output_path);
    std::fs::write(&temp_path, payload)?;
    std::fs::rename(&temp_path, output_path)?;

    info!(
        path = %output_path.display(),
        records = words.len(),
        "Export written"
    );

    Ok(words.len())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
