//! Market data types

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One bar of a fixed timeframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Close/high/low series derived from a candle window, index-aligned
/// with the candles (index 0 = oldest)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

impl PriceSeries {
    /// Derive the three series from chronologically ordered candles
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut series = Self {
            closes: Vec::with_capacity(candles.len()),
            highs: Vec::with_capacity(candles.len()),
            lows: Vec::with_capacity(candles.len()),
        };

        for candle in candles {
            series.closes.push(to_f64(candle.close));
            series.highs.push(to_f64(candle.high));
            series.lows.push(to_f64(candle.low));
        }

        series
    }

    /// Number of bars
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Market data errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Exchange rejected the request (unknown symbol, rate limit, ...)
    #[error("Exchange API error {status}: {body}")]
    Api { status: u16, body: String },
    /// A kline row could not be parsed
    #[error("Invalid candle: {0}")]
    InvalidCandle(String),
}
