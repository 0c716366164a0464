//! clauson-import - dictionary import tool
//!
//! Subcommands: `import` (default), `reset`, `export`, `verify`, `analyze`.
//! Settings resolve CLI → environment → TOML file → compiled defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clauson_common::config::{
    load_toml_config, CliOverrides, ImportConfig, ENV_BATCH_SIZE, ENV_DATABASE, ENV_DATA_DIR,
};
use clauson_common::db::{count_indexes, init_database, reset_schema};
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use clauson_import::db::words::{dictionary_statistics, etymology_distribution, most_repeated_words};
use clauson_import::services::data_analyzer::format_character;
use clauson_import::services::{analyze_dataset, export_to_json, verify, FileScanner, ImportOrchestrator};
use clauson_import::{RecordStore, SqliteStore};

/// Command-line arguments for clauson-import
#[derive(Parser, Debug)]
#[command(name = "clauson-import")]
#[command(about = "Import the Clauson dictionary dataset into SQLite")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config_dir>/clauson/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    data_dir: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = ENV_DATABASE)]
    database: Option<PathBuf>,

    /// Entries per commit
    #[arg(long, global = true, env = ENV_BATCH_SIZE)]
    batch_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clear the store and import every dataset file
    Import,
    /// Drop and recreate the schema
    Reset,
    /// Write every record to a single JSON file
    Export {
        #[arg(short, long, default_value = "frontend/public/dictionary_data.json")]
        output: PathBuf,
    },
    /// Print sample rows and lookups from an imported store
    Verify,
    /// Survey dataset characters and etymology codes without importing
    Analyze,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Default filter until the configured level is known
    let log_filter = init_tracing();

    let loaded = load_toml_config(args.config.as_deref())?;
    if let Some(warning) = loaded.source.fallback_warning() {
        warn!("{}", warning);
    }

    let cli = CliOverrides {
        data_dir: args.data_dir.clone(),
        database: args.database.clone(),
        batch_size: args.batch_size,
    };
    let config = ImportConfig::resolve(&cli, &loaded.toml)?;
    log_filter.reload(env_filter(&config.log_level))?;

    let result = match args.command.unwrap_or(Command::Import) {
        Command::Import => run_import(&config).await,
        Command::Reset => run_reset(&config).await,
        Command::Export { output } => run_export(&config, output).await,
        Command::Verify => run_verify(&config).await,
        Command::Analyze => run_analyze(&config),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` when set, otherwise `level`
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(env_filter("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

async fn open_store(config: &ImportConfig) -> Result<SqlitePool> {
    info!("Database: {}", config.database.display());
    init_database(&config.database)
        .await
        .context("Failed to open database")
}

async fn run_import(config: &ImportConfig) -> Result<()> {
    info!("Data directory: {}", config.data_dir.display());

    let pool = open_store(config).await?;
    let mut store = SqliteStore::new(pool.clone());
    store.clear().await?;
    store.commit().await?;

    let scanner = FileScanner::new(&config.extension);
    let mut orchestrator = ImportOrchestrator::new(store, scanner, config.batch_size);
    let stats = orchestrator
        .run(&config.data_dir)
        .await
        .context("Import aborted")?;

    println!("\n=== Import complete ({}s) ===", stats.duration_seconds());
    for line in stats.report_lines(5) {
        println!("{}", line);
    }

    println!("\nIndexes: {}", count_indexes(&pool).await?);
    print_statistics(&pool).await?;

    pool.close().await;
    Ok(())
}

async fn print_statistics(pool: &SqlitePool) -> Result<()> {
    let stats = dictionary_statistics(pool).await?;

    println!("\n=== Statistics ===");
    println!("Unique words: {}", stats.unique_words);
    println!("Total entries: {}", stats.total_entries);
    println!("Etymology types: {}", stats.etymology_types);
    println!("Repeated words: {}", stats.repeated_words);
    println!("Variants: {}", stats.total_variants);

    println!("\nEtymology distribution:");
    for (label, count) in etymology_distribution(pool, 10).await? {
        let label = if label.is_empty() { "(none)" } else { label.as_str() };
        println!("  {}: {}", label, count);
    }

    println!("\nMost repeated words:");
    for (word, max_occurrence) in most_repeated_words(pool, 5).await? {
        println!("  {}: {} entries", word, max_occurrence);
    }

    Ok(())
}

async fn run_reset(config: &ImportConfig) -> Result<()> {
    let pool = open_store(config).await?;
    reset_schema(&pool).await?;
    println!("Schema reset: {}", config.database.display());
    pool.close().await;
    Ok(())
}

async fn run_export(config: &ImportConfig, output: PathBuf) -> Result<()> {
    let pool = open_store(config).await?;
    let count = export_to_json(&pool, &output)
        .await
        .with_context(|| format!("Failed to export to {}", output.display()))?;
    println!("Exported {} records to {}", count, output.display());
    pool.close().await;
    Ok(())
}

async fn run_verify(config: &ImportConfig) -> Result<()> {
    let pool = open_store(config).await?;
    let report = verify(&pool).await?;

    println!("=== Normalization samples ===");
    for (sample, key) in &report.normalization {
        println!("  '{}' -> '{}'", sample, key);
    }

    println!("\n=== Stored keys ===");
    for sample in &report.stored {
        let marker = if sample.is_consistent() { "ok" } else { "MISMATCH" };
        println!(
            "  [{}] '{}' stored '{}' recomputed '{}' keywords {:?}",
            marker, sample.word, sample.stored_key, sample.recomputed_key, sample.stored_keywords
        );
    }
    if report.inconsistent_count() > 0 {
        println!("  {} stored rows differ from current rules", report.inconsistent_count());
    }

    println!("\n=== Rows sharing a key ===");
    for (word, key) in &report.same_key {
        println!("  '{}' ({})", word, key);
    }

    println!("\n=== Expanded etymology ===");
    for (word, label) in &report.etymology {
        println!("  '{}': {}", word, label);
    }

    println!("\n=== Lookups ===");
    for lookup in &report.lookups {
        println!("  '{}' (key '{}'): {} matches", lookup.term, lookup.key, lookup.matches.len());
        for m in &lookup.matches {
            println!("    [{}] {} #{}: {}", m.kind.as_str(), m.word, m.occurrence_number, m.meaning);
        }
    }

    pool.close().await;
    Ok(())
}

fn run_analyze(config: &ImportConfig) -> Result<()> {
    println!("Scanning {}...", config.data_dir.display());
    let analysis = analyze_dataset(&config.data_dir, &config.extension)?;

    for (file, reason) in &analysis.skipped_files {
        println!("Error reading {}: {}", file, reason);
    }

    println!("\n=== Unique characters in 'word' ===");
    for (c, count) in &analysis.characters {
        println!("{}", format_character(*c, *count));
    }

    println!("\n=== Etymology codes ===");
    for (code, count) in analysis.etymology_codes() {
        println!("'{}': {}", code, count);
    }

    Ok(())
}
