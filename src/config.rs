//! Configuration types for divergence-scanner
//!
//! Settings come from a TOML file and are then overridden by environment
//! variables (`.env` is loaded first by the binary).

use crate::divergence::{min_bars, DivergenceParams};
use crate::notify::{FonnteConfig, FONNTE_API_URL};
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing FONNTE_TOKEN")]
    MissingToken,
    #[error("Missing FONNTE_TARGETS")]
    MissingTargets,
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScanConfig,
    #[serde(default)]
    pub divergence: DivergenceConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Instruments and schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Candle timeframe label, passed to the exchange as-is
    #[serde(default = "default_timeframe")]
    pub timeframe: String,

    /// Instruments in "BASE/QUOTE" form
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Delay between scan starts (seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Candles fetched per instrument
    #[serde(default = "default_candle_limit")]
    pub candle_limit: usize,
}

fn default_timeframe() -> String {
    "1d".to_string()
}
fn default_symbols() -> Vec<String> {
    [
        "BNB/USDT", "ETH/USDT", "ADA/USDT", "TRX/USDT", "DOGE/USDT", "DOT/USDT", "TON/USDT",
        "LUNC/USDT", "LINK/USDT",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_interval_secs() -> u64 {
    43_200 // 12h
}
fn default_candle_limit() -> usize {
    250
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeframe: default_timeframe(),
            symbols: default_symbols(),
            interval_secs: default_interval_secs(),
            candle_limit: default_candle_limit(),
        }
    }
}

impl ScanConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// RSI and pivot parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergenceConfig {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_lookback")]
    pub lookback_left: usize,
    #[serde(default = "default_lookback")]
    pub lookback_right: usize,
    #[serde(default = "default_range_lower")]
    pub range_lower: usize,
    #[serde(default = "default_range_upper")]
    pub range_upper: usize,
}

fn default_rsi_period() -> usize {
    14
}
fn default_lookback() -> usize {
    5
}
fn default_range_lower() -> usize {
    5
}
fn default_range_upper() -> usize {
    60
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            lookback_left: 5,
            lookback_right: 5,
            range_lower: 5,
            range_upper: 60,
        }
    }
}

impl DivergenceConfig {
    pub fn params(&self) -> DivergenceParams {
        DivergenceParams {
            lookback_left: self.lookback_left,
            lookback_right: self.lookback_right,
            range_lower: self.range_lower,
            range_upper: self.range_upper,
        }
    }

    /// Minimum candles needed per instrument
    pub fn min_bars(&self) -> usize {
        min_bars(self.rsi_period, &self.params())
    }
}

/// WhatsApp gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub targets: Vec<String>,
}

fn default_endpoint() -> String {
    FONNTE_API_URL.to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            targets: Vec::new(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empties
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        self.apply_env(|var| std::env::var(var).ok())?;
        Ok(self)
    }

    /// Apply overrides from `lookup` (FONNTE_TOKEN, FONNTE_TARGETS, FONNTE_TARGET,
    /// FONNTE_ENDPOINT, TIMEFRAME, RUN_INTERVAL in ms, SYMBOLS)
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(token) = lookup("FONNTE_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.notify.token = Some(token.trim().to_string());
        }

        if let Some(targets) = lookup("FONNTE_TARGETS") {
            self.notify.targets = split_list(&targets);
        } else if let Some(target) = lookup("FONNTE_TARGET") {
            self.notify.targets = split_list(&target);
        }

        if let Some(endpoint) = lookup("FONNTE_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            self.notify.endpoint = endpoint.trim().to_string();
        }

        if let Some(timeframe) = lookup("TIMEFRAME").filter(|t| !t.trim().is_empty()) {
            self.scanner.timeframe = timeframe.trim().to_string();
        }

        if let Some(interval) = lookup("RUN_INTERVAL") {
            let millis: u64 = interval
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: "RUN_INTERVAL",
                    value: interval.clone(),
                })?;
            self.scanner.interval_secs = millis / 1000;
        }

        if let Some(symbols) = lookup("SYMBOLS") {
            self.scanner.symbols = split_list(&symbols);
        }

        Ok(())
    }

    /// Check scan and indicator parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let div = &self.divergence;

        if self.scanner.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols configured".into()));
        }
        if self.scanner.interval_secs == 0 {
            return Err(ConfigError::Invalid("scan interval must be at least 1s".into()));
        }
        if div.rsi_period == 0 {
            return Err(ConfigError::Invalid("rsi_period must be positive".into()));
        }
        if div.range_lower > div.range_upper {
            return Err(ConfigError::Invalid(format!(
                "range_lower ({}) exceeds range_upper ({})",
                div.range_lower, div.range_upper
            )));
        }
        if self.scanner.candle_limit < div.min_bars() {
            return Err(ConfigError::Invalid(format!(
                "candle_limit ({}) below the {} bars required",
                self.scanner.candle_limit,
                div.min_bars()
            )));
        }

        Ok(())
    }

    /// Gateway settings, failing when credentials or recipients are missing
    pub fn fonnte(&self) -> Result<FonnteConfig, ConfigError> {
        let token = self
            .notify
            .token
            .as_deref()
            .ok_or(ConfigError::MissingToken)?;
        if self.notify.targets.is_empty() {
            return Err(ConfigError::MissingTargets);
        }

        Ok(FonnteConfig::new(token, self.notify.targets.clone()).endpoint(&self.notify.endpoint))
    }

    /// Token with all but the last four characters hidden
    pub fn masked_token(&self) -> String {
        match &self.notify.token {
            Some(token) if token.chars().count() > 4 => {
                let tail: String = token.chars().skip(token.chars().count() - 4).collect();
                format!("****{}", tail)
            }
            Some(_) => "****".to_string(),
            None => "<unset>".to_string(),
        }
    }
}
