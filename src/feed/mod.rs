//! Market data module
//!
//! Fetches OHLCV candles from Binance's public REST API

mod binance;
mod types;

pub use binance::{BinanceConfig, BinanceKlines};
pub use types::{Candle, FeedError, PriceSeries};

use async_trait::async_trait;

/// Trait for candle sources
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch the most recent `limit` candles for an instrument, oldest first
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, FeedError>;
}
