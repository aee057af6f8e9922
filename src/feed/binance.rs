//! Binance REST kline client

use super::{Candle, CandleSource, FeedError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Binance REST base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Maximum klines Binance returns per request
const MAX_KLINES_PER_REQUEST: usize = 1000;

/// Raw kline row (Binance returns an array of arrays)
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    u64,    // 8: Number of trades
    String, // 9: Taker buy base
    String, // 10: Taker buy quote
    String, // 11: Ignore
);

/// Configuration for the kline client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Candle source backed by `GET /api/v3/klines`
pub struct BinanceKlines {
    config: BinanceConfig,
    client: Client,
}

impl BinanceKlines {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, FeedError> {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Map a "BASE/QUOTE" instrument to the exchange symbol ("BNB/USDT" -> "BNBUSDT")
    pub fn exchange_symbol(symbol: &str) -> String {
        symbol.replace('/', "").to_uppercase()
    }

    /// Parse a klines response body
    fn parse_klines(body: &str) -> Result<Vec<Candle>, FeedError> {
        let rows: Vec<RawKline> = serde_json::from_str(body)
            .map_err(|e| FeedError::InvalidCandle(format!("malformed klines payload: {}", e)))?;

        rows.into_iter().map(Self::convert_row).collect()
    }

    fn convert_row(raw: RawKline) -> Result<Candle, FeedError> {
        let open_time = Utc
            .timestamp_millis_opt(raw.0)
            .single()
            .ok_or_else(|| FeedError::InvalidCandle(format!("bad open time {}", raw.0)))?;

        Ok(Candle {
            open_time,
            open: parse_decimal(&raw.1)?,
            high: parse_decimal(&raw.2)?,
            low: parse_decimal(&raw.3)?,
            close: parse_decimal(&raw.4)?,
            volume: parse_decimal(&raw.5)?,
        })
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, FeedError> {
    Decimal::from_str(value).map_err(|_| FeedError::InvalidCandle(format!("bad price {:?}", value)))
}

#[async_trait]
impl CandleSource for BinanceKlines {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, FeedError> {
        let url = format!("{}/api/v3/klines", self.config.base_url);
        let exchange_symbol = Self::exchange_symbol(symbol);
        let limit = limit.min(MAX_KLINES_PER_REQUEST).to_string();

        tracing::debug!(symbol = %exchange_symbol, timeframe, "Fetching klines from Binance");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", exchange_symbol.as_str()),
                ("interval", timeframe),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api { status, body });
        }

        let body = response.text().await?;
        let candles = Self::parse_klines(&body)?;

        tracing::debug!(symbol = %exchange_symbol, count = candles.len(), "Fetched klines");
        Ok(candles)
    }
}
