//! Scanner types

use crate::config::Config;
use crate::divergence::{min_bars, DivergenceAlert, DivergenceError, DivergenceParams};
use crate::feed::FeedError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Immutable settings for a scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub timeframe: String,
    pub symbols: Vec<String>,
    pub candle_limit: usize,
    pub interval: Duration,
    pub rsi_period: usize,
    pub params: DivergenceParams,
}

impl ScannerConfig {
    /// Bars required before the analyzer may run
    pub fn min_bars(&self) -> usize {
        min_bars(self.rsi_period, &self.params)
    }
}

impl From<&Config> for ScannerConfig {
    fn from(config: &Config) -> Self {
        Self {
            timeframe: config.scanner.timeframe.clone(),
            symbols: config.scanner.symbols.clone(),
            candle_limit: config.scanner.candle_limit,
            interval: config.scanner.interval(),
            rsi_period: config.divergence.rsi_period,
            params: config.divergence.params(),
        }
    }
}

/// Per-instrument scan failures
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Fetch failed for {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: FeedError,
    },
    #[error("Insufficient data for {symbol}: got {got} bars, need {need}")]
    InsufficientData {
        symbol: String,
        got: usize,
        need: usize,
    },
    #[error("Analysis failed for {symbol}: {source}")]
    Analysis {
        symbol: String,
        #[source]
        source: DivergenceError,
    },
}

/// Outcome of one scan pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Instruments analysed
    pub scanned: usize,
    /// Instruments skipped after an error
    pub failed: usize,
    /// Alerts produced, in dispatch order
    pub alerts: Vec<DivergenceAlert>,
    /// Alerts the notifier failed to deliver
    pub notify_failures: usize,
}
