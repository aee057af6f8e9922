//! Integration tests for configuration loading

use divergence_scanner::config::{Config, ConfigError};
use divergence_scanner::scanner::ScannerConfig;
use std::io::Write;

#[test]
fn test_example_config_loads() {
    let config = Config::from_toml_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.scanner.timeframe, "1d");
    assert_eq!(config.scanner.symbols.len(), 9);
    assert!(config.validate().is_ok());
    // Credentials come from the environment
    assert!(matches!(config.fonnte(), Err(ConfigError::MissingToken)));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [scanner]
        timeframe = "4h"
        symbols = ["BTC/USDT"]
        candle_limit = 300

        [notify]
        token = "tok"
        targets = ["62811"]
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert!(config.validate().is_ok());

    let scanner = ScannerConfig::from(&config);
    assert_eq!(scanner.timeframe, "4h");
    assert_eq!(scanner.symbols, vec!["BTC/USDT"]);
    assert_eq!(scanner.candle_limit, 300);

    let fonnte = config.fonnte().unwrap();
    assert_eq!(fonnte.targets, vec!["62811"]);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[scanner\ntimeframe = ").unwrap();

    let result = Config::load(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_env_completes_file_config() {
    let mut config = Config::from_toml_str(include_str!("../../config.toml.example")).unwrap();
    config
        .apply_env(|var| match var {
            "FONNTE_TOKEN" => Some("tok".to_string()),
            "FONNTE_TARGETS" => Some("62811,62822".to_string()),
            _ => None,
        })
        .unwrap();

    let fonnte = config.fonnte().unwrap();
    assert_eq!(fonnte.targets.len(), 2);
}
