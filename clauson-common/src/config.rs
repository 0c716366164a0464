//! Configuration loading and setting resolution
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the dataset directory
pub const ENV_DATA_DIR: &str = "CLAUSON_DATA_DIR";
/// Environment variable overriding the database file path
pub const ENV_DATABASE: &str = "CLAUSON_DATABASE";
/// Environment variable overriding the commit batch size
pub const ENV_BATCH_SIZE: &str = "CLAUSON_BATCH_SIZE";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[import]` section of the TOML config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSection {
    pub batch_size: Option<usize>,
    pub extension: Option<String>,
}

/// On-disk TOML configuration. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub import: ImportSection,
}

/// Compiled fallbacks used when nothing else provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub batch_size: usize,
    pub extension: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let database = dirs::data_local_dir()
            .map(|d| d.join("clauson").join("clauson.db"))
            .unwrap_or_else(|| PathBuf::from("./clauson_data/clauson.db"));

        Self {
            data_dir: PathBuf::from("./Datas"),
            database,
            batch_size: 100,
            extension: "json".to_string(),
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub batch_size: Option<usize>,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub batch_size: usize,
    pub extension: String,
    pub log_level: String,
}

impl ImportConfig {
    /// Resolve all settings from CLI, environment, TOML and compiled defaults
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env_path(ENV_DATA_DIR))
            .or_else(|| toml_config.data_dir.clone())
            .unwrap_or(defaults.data_dir);

        let database = cli
            .database
            .clone()
            .or_else(|| env_path(ENV_DATABASE))
            .or_else(|| toml_config.database.clone())
            .unwrap_or(defaults.database);

        let batch_size = match cli.batch_size {
            Some(size) => size,
            None => match env_batch_size()? {
                Some(size) => size,
                None => toml_config.import.batch_size.unwrap_or(defaults.batch_size),
            },
        };
        if batch_size == 0 {
            return Err(Error::InvalidInput(
                "batch size must be at least 1".to_string(),
            ));
        }

        let extension = toml_config
            .import
            .extension
            .as_deref()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or(defaults.extension);

        Ok(Self {
            data_dir,
            database,
            batch_size,
            extension,
            log_level: toml_config.logging.level.clone(),
        })
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn env_batch_size() -> Result<Option<usize>> {
    match std::env::var(ENV_BATCH_SIZE) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?} is not a number: {}", ENV_BATCH_SIZE, raw, e))),
        _ => Ok(None),
    }
}

/// Default configuration file location (`<config_dir>/clauson/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clauson").join("config.toml"))
}

/// Where the TOML configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Nothing at the default location; defaults apply
    DefaultMissing(PathBuf),
    /// No platform config directory; defaults apply
    NoConfigDir,
}

impl ConfigSource {
    /// Warning for the caller to log when defaults were used
    ///
    /// Loading happens before logging is configured, so the caller logs this
    /// once its subscriber is installed.
    pub fn fallback_warning(&self) -> Option<String> {
        match self {
            ConfigSource::File(_) => None,
            ConfigSource::DefaultMissing(path) => {
                Some(format!("No config file at {}, using defaults", path.display()))
            }
            ConfigSource::NoConfigDir => {
                Some("Could not determine config directory, using defaults".to_string())
            }
        }
    }
}

/// TOML configuration plus where it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub toml: TomlConfig,
    pub source: ConfigSource,
}

/// Load the TOML configuration
///
/// An explicitly requested file must exist. A missing file at the default
/// location yields defaults and a `fallback_warning`. A malformed file is
/// always an error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                return Ok(LoadedConfig {
                    toml: TomlConfig::default(),
                    source: ConfigSource::DefaultMissing(path),
                });
            }
            None => {
                return Ok(LoadedConfig {
                    toml: TomlConfig::default(),
                    source: ConfigSource::NoConfigDir,
                });
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let parsed: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(LoadedConfig {
        toml: parsed,
        source: ConfigSource::File(path),
    })
}
