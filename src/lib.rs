//! divergence-scanner: RSI divergence alerts for crypto pairs
//!
//! This library provides the core components for:
//! - Candle retrieval from Binance's REST API
//! - Wilder RSI and strict pivot detection
//! - Regular bullish/bearish divergence classification
//! - Sequential, non-overlapping scan scheduling
//! - WhatsApp alert delivery via the Fonnte gateway
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod divergence;
pub mod feed;
pub mod indicators;
pub mod notify;
pub mod scanner;
pub mod telemetry;
