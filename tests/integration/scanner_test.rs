//! End-to-end scanner tests with in-memory collaborators

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use divergence_scanner::divergence::{DivergenceKind, DivergenceParams};
use divergence_scanner::feed::{Candle, CandleSource, FeedError};
use divergence_scanner::notify::{Notifier, NotifyError};
use divergence_scanner::scanner::{Scanner, ScannerConfig};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Candles whose low dips to 5.0 at bar 7 and 4.8 at bar 15 while RSI
/// bottoms higher the second time
fn bullish_candles() -> Vec<Candle> {
    let closes = [
        10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 8.0, 5.0, 7.0, 9.0, 10.0, 9.0, 8.0, 7.5, 7.0, 4.8, 4.9,
        5.2,
    ];
    let start = Utc.timestamp_millis_opt(1_704_067_200_000).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let price = Decimal::from_f64(close).unwrap();
            Candle {
                open_time: start + ChronoDuration::hours(4 * i as i64),
                open: price,
                high: price,
                low: price,
                close: price,
                volume: Decimal::from(1000),
            }
        })
        .collect()
}

struct FlakySource;

#[async_trait]
impl CandleSource for FlakySource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: &str,
        _limit: usize,
    ) -> Result<Vec<Candle>, FeedError> {
        match symbol {
            "DOGE/USDT" => Err(FeedError::Api {
                status: 429,
                body: "Too many requests".to_string(),
            }),
            "LUNC/USDT" => Ok(bullish_candles()[..5].to_vec()),
            _ => Ok(bullish_candles()),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().await.push(message.to_string());
        Ok(())
    }
}

fn scanner_config() -> ScannerConfig {
    ScannerConfig {
        timeframe: "4h".to_string(),
        symbols: ["DOGE/USDT", "LUNC/USDT", "LINK/USDT"]
            .into_iter()
            .map(String::from)
            .collect(),
        candle_limit: 18,
        interval: Duration::from_secs(3600),
        rsi_period: 5,
        params: DivergenceParams {
            lookback_left: 2,
            lookback_right: 2,
            range_lower: 5,
            range_upper: 60,
        },
    }
}

#[tokio::test]
async fn test_scan_skips_failures_and_alerts_rest() {
    let notifier = RecordingNotifier::default();
    let scanner = Scanner::new(FlakySource, notifier.clone(), scanner_config());

    let report = scanner.scan_once().await;

    assert_eq!(report.scanned, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, DivergenceKind::Bullish);

    let sent = notifier.sent.lock().await;
    assert_eq!(
        *sent,
        vec!["🟢 LINK/USDT → Regular Bullish Divergence detected on 4h".to_string()]
    );
}

#[tokio::test]
async fn test_repeated_scans_are_independent() {
    let notifier = RecordingNotifier::default();
    let scanner = Scanner::new(FlakySource, notifier.clone(), scanner_config());

    let first = scanner.scan_once().await;
    let second = scanner.scan_once().await;

    // No deduplication: the same divergence alerts again
    assert_eq!(first.alerts, second.alerts);
    assert_eq!(notifier.sent.lock().await.len(), 2);
}

#[tokio::test]
async fn test_run_until_stops_on_shutdown() {
    let notifier = RecordingNotifier::default();
    let scanner = Scanner::new(FlakySource, notifier.clone(), scanner_config());

    tokio::time::timeout(
        Duration::from_secs(5),
        scanner.run_until(tokio::time::sleep(Duration::from_millis(50))),
    )
    .await
    .unwrap();

    assert_eq!(notifier.sent.lock().await.len(), 1);
}
