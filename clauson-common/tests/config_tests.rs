//! Unit tests for configuration resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate CLAUSON_* variables are marked with #[serial].

use clauson_common::config::{
    default_config_path, load_toml_config, CliOverrides, CompiledDefaults, ConfigSource,
    ImportConfig, ImportSection, LoggingConfig, TomlConfig, ENV_BATCH_SIZE, ENV_DATABASE,
    ENV_DATA_DIR,
};
use clauson_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_DATA_DIR);
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_BATCH_SIZE);
}

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert_eq!(defaults.batch_size, 100);
    assert_eq!(defaults.extension, "json");
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.database.ends_with("clauson.db"));
}

#[test]
#[serial]
fn test_no_overrides_uses_defaults() {
    clear_env();

    let config = ImportConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();
    let defaults = CompiledDefaults::for_current_platform();

    assert_eq!(config.data_dir, defaults.data_dir);
    assert_eq!(config.database, defaults.database);
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.extension, "json");
}

#[test]
#[serial]
fn test_toml_overrides_defaults() {
    clear_env();

    let toml_config = TomlConfig {
        data_dir: Some(PathBuf::from("/srv/datas")),
        database: Some(PathBuf::from("/srv/clauson.db")),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        import: ImportSection {
            batch_size: Some(250),
            extension: Some(".JSON".to_string()),
        },
    };

    let config = ImportConfig::resolve(&CliOverrides::default(), &toml_config).unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/srv/datas"));
    assert_eq!(config.database, PathBuf::from("/srv/clauson.db"));
    assert_eq!(config.batch_size, 250);
    assert_eq!(config.extension, "json");
    assert_eq!(config.log_level, "debug");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_DATA_DIR, "/env/datas");
    env::set_var(ENV_BATCH_SIZE, "7");

    let toml_config = TomlConfig {
        data_dir: Some(PathBuf::from("/toml/datas")),
        import: ImportSection {
            batch_size: Some(250),
            extension: None,
        },
        ..TomlConfig::default()
    };

    let config = ImportConfig::resolve(&CliOverrides::default(), &toml_config).unwrap();
    clear_env();

    assert_eq!(config.data_dir, PathBuf::from("/env/datas"));
    assert_eq!(config.batch_size, 7);
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_DATABASE, "/env/clauson.db");

    let cli = CliOverrides {
        database: Some(PathBuf::from("/cli/clauson.db")),
        batch_size: Some(3),
        ..CliOverrides::default()
    };

    let config = ImportConfig::resolve(&cli, &TomlConfig::default()).unwrap();
    clear_env();

    assert_eq!(config.database, PathBuf::from("/cli/clauson.db"));
    assert_eq!(config.batch_size, 3);
}

#[test]
#[serial]
fn test_zero_batch_size_rejected() {
    clear_env();

    let cli = CliOverrides {
        batch_size: Some(0),
        ..CliOverrides::default()
    };

    match ImportConfig::resolve(&cli, &TomlConfig::default()) {
        Err(Error::InvalidInput(_)) => {}
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_non_numeric_env_batch_size_is_config_error() {
    clear_env();
    env::set_var(ENV_BATCH_SIZE, "lots");

    let result = ImportConfig::resolve(&CliOverrides::default(), &TomlConfig::default());
    clear_env();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_explicit_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "data_dir = \"/data\"\n\n[import]\nbatch_size = 50\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let loaded = load_toml_config(Some(&path)).unwrap();
    assert_eq!(loaded.source, ConfigSource::File(path.clone()));
    assert_eq!(loaded.source.fallback_warning(), None);

    let config = loaded.toml;
    assert_eq!(config.data_dir, Some(PathBuf::from("/data")));
    assert_eq!(config.import.batch_size, Some(50));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.database, None);
}

#[test]
fn test_missing_explicit_toml_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_toml_config(Some(&temp_dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_toml_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_dir = [unterminated").unwrap();

    let result = load_toml_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_default_file_reports_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let expected = default_config_path();
    let loaded = load_toml_config(None);

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    let expected = expected.unwrap();
    assert_eq!(expected, temp_dir.path().join("clauson").join("config.toml"));

    let loaded = loaded.unwrap();
    assert_eq!(loaded.toml, TomlConfig::default());
    assert_eq!(loaded.source, ConfigSource::DefaultMissing(expected));
    let warning = loaded.source.fallback_warning().unwrap();
    assert!(warning.contains("using defaults"), "unexpected warning: {}", warning);
}
