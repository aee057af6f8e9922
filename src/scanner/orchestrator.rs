//! Divergence scan orchestrator
//!
//! Each pass:
//! 1. Fetches a candle window per instrument (sequentially)
//! 2. Computes RSI and classifies divergence at the confirmed bar
//! 3. Dispatches one message per detected divergence
//!
//! Nothing is carried between passes.

use super::{ScanError, ScanReport, ScannerConfig};
use crate::divergence::{analyze, Divergence, DivergenceAlert};
use crate::feed::{CandleSource, PriceSeries};
use crate::indicators::compute_rsi;
use crate::notify::Notifier;
use crate::telemetry::{self, ScanMetric};
use std::future::Future;
use std::time::Instant;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

/// Periodic divergence scanner
pub struct Scanner<S: CandleSource, N: Notifier> {
    source: S,
    notifier: N,
    config: ScannerConfig,
}

impl<S: CandleSource, N: Notifier> Scanner<S, N> {
    /// Create a new scanner
    pub fn new(source: S, notifier: N, config: ScannerConfig) -> Self {
        Self {
            source,
            notifier,
            config,
        }
    }

    /// Fetch and analyse one instrument without notifying
    pub async fn scan_symbol(
        &self,
        symbol: &str,
    ) -> Result<(Divergence, Vec<DivergenceAlert>), ScanError> {
        let candles = self
            .source
            .fetch_candles(symbol, &self.config.timeframe, self.config.candle_limit)
            .await
            .map_err(|source| ScanError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        let need = self.config.min_bars();
        if candles.len() < need {
            return Err(ScanError::InsufficientData {
                symbol: symbol.to_string(),
                got: candles.len(),
                need,
            });
        }

        let series = PriceSeries::from_candles(&candles);
        let rsi = compute_rsi(&series.closes, self.config.rsi_period);
        let divergence = analyze(&rsi, &series.highs, &series.lows, &self.config.params)
            .map_err(|source| ScanError::Analysis {
                symbol: symbol.to_string(),
                source,
            })?;

        let alerts = divergence
            .kinds()
            .into_iter()
            .map(|kind| DivergenceAlert::new(symbol, &self.config.timeframe, kind))
            .collect();

        Ok((divergence, alerts))
    }

    /// Run one pass over every configured instrument.
    ///
    /// Per-instrument and notifier failures are logged and counted; they
    /// never stop the pass.
    pub async fn scan_once(&self) -> ScanReport {
        let span = tracing::info_span!("scan", scan_id = %Uuid::new_v4());
        self.scan_all().instrument(span).await
    }

    async fn scan_all(&self) -> ScanReport {
        let started = Instant::now();
        let mut report = ScanReport::default();

        for symbol in &self.config.symbols {
            let alerts = match self.scan_symbol(symbol).await {
                Ok((divergence, alerts)) => {
                    report.scanned += 1;
                    telemetry::increment(ScanMetric::SymbolScanned);
                    tracing::debug!(
                        symbol = %symbol,
                        rsi = divergence.oscillator,
                        pivot_low = divergence.pivot_low,
                        pivot_high = divergence.pivot_high,
                        "Symbol analysed"
                    );
                    alerts
                }
                Err(e) => {
                    report.failed += 1;
                    telemetry::increment(ScanMetric::SymbolFailed);
                    tracing::error!(symbol = %symbol, error = %e, "Error scanning symbol");
                    continue;
                }
            };

            for alert in alerts {
                telemetry::record_alert(alert.kind);
                tracing::info!(symbol = %symbol, kind = alert.kind.label(), "Divergence detected");

                if let Err(e) = self.notifier.notify(&alert.message()).await {
                    report.notify_failures += 1;
                    telemetry::increment(ScanMetric::NotifyFailed);
                    tracing::error!(symbol = %symbol, error = %e, "Failed to deliver alert");
                }
                report.alerts.push(alert);
            }
        }

        telemetry::increment(ScanMetric::ScanCompleted);
        telemetry::record_scan_duration(started.elapsed());
        tracing::info!(
            scanned = report.scanned,
            failed = report.failed,
            alerts = report.alerts.len(),
            "Scan complete"
        );

        report
    }

    /// Scan immediately, then once per interval until `shutdown` resolves.
    ///
    /// A pass is awaited before the next tick is taken, so passes never
    /// overlap; ticks missed during a slow pass are delayed, not bunched.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            symbols = self.config.symbols.len(),
            timeframe = %self.config.timeframe,
            interval_secs = self.config.interval.as_secs(),
            "Divergence scanner started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping scanner");
                    break;
                }
                _ = ticker.tick() => {
                    self.scan_once().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divergence::{DivergenceKind, DivergenceParams};
    use crate::feed::{Candle, FeedError};
    use crate::notify::NotifyError;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex;

    const BULLISH: [f64; 18] = [
        10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 8.0, 5.0, 7.0, 9.0, 10.0, 9.0, 8.0, 7.5, 7.0, 4.8, 4.9,
        5.2,
    ];
    const BEARISH: [f64; 18] = [
        10.0, 9.0, 8.0, 9.0, 10.0, 11.0, 12.0, 15.0, 13.0, 11.0, 10.0, 11.0, 12.0, 12.5, 13.0, 15.2,
        15.1, 14.8,
    ];

    fn candles(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.timestamp_millis_opt(1_704_067_200_000).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let price = Decimal::from_f64(close).unwrap();
                Candle {
                    open_time: start + ChronoDuration::days(i as i64),
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    volume: Decimal::ONE,
                }
            })
            .collect()
    }

    struct MockSource {
        replies: HashMap<String, Vec<Candle>>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(replies: &[(&str, Vec<Candle>)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(s, c)| (s.to_string(), c.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CandleSource for MockSource {
        async fn fetch_candles(
            &self,
            symbol: &str,
            _timeframe: &str,
            limit: usize,
        ) -> Result<Vec<Candle>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(symbol) {
                Some(candles) => {
                    let skip = candles.len().saturating_sub(limit);
                    Ok(candles[skip..].to_vec())
                }
                None => Err(FeedError::Api {
                    status: 400,
                    body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(&self, message: &str) -> Result<(), NotifyError> {
            self.sent.lock().await.push(message.to_string());
            if self.fail {
                return Err(NotifyError::Delivery { failed: 1, total: 1 });
            }
            Ok(())
        }
    }

    fn config(symbols: &[&str]) -> ScannerConfig {
        ScannerConfig {
            timeframe: "1d".to_string(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
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
    async fn test_scan_symbol_bullish() {
        let source = MockSource::new(&[("BNB/USDT", candles(&BULLISH))]);
        let scanner = Scanner::new(source, MockNotifier::default(), config(&["BNB/USDT"]));

        let (divergence, alerts) = scanner.scan_symbol("BNB/USDT").await.unwrap();
        assert!(divergence.bullish);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, DivergenceKind::Bullish);
    }

    #[tokio::test]
    async fn test_scan_once_dispatches_alerts() {
        let source = MockSource::new(&[
            ("BNB/USDT", candles(&BULLISH)),
            ("ETH/USDT", candles(&BEARISH)),
        ]);
        let scanner = Scanner::new(
            source,
            MockNotifier::default(),
            config(&["BNB/USDT", "ETH/USDT"]),
        );

        let report = scanner.scan_once().await;
        assert_eq!(report.scanned, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.alerts.len(), 2);

        let sent = scanner.notifier.sent.lock().await;
        assert_eq!(
            *sent,
            vec![
                "🟢 BNB/USDT → Regular Bullish Divergence detected on 1d".to_string(),
                "🔴 ETH/USDT → Regular Bearish Divergence detected on 1d".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let source = MockSource::new(&[("BNB/USDT", candles(&BULLISH))]);
        let scanner = Scanner::new(
            source,
            MockNotifier::default(),
            config(&["FAKE/USDT", "BNB/USDT"]),
        );

        let report = scanner.scan_once().await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.scanned, 1);

        let sent = scanner.notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("BNB/USDT"));
        assert!(!sent.iter().any(|m| m.contains("FAKE/USDT")));
    }

    #[tokio::test]
    async fn test_insufficient_data_skipped() {
        let source = MockSource::new(&[
            ("TON/USDT", candles(&BULLISH[..7])),
            ("BNB/USDT", candles(&BULLISH)),
        ]);
        let scanner = Scanner::new(
            source,
            MockNotifier::default(),
            config(&["TON/USDT", "BNB/USDT"]),
        );

        let err = scanner.scan_symbol("TON/USDT").await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::InsufficientData { got: 7, need: 8, .. }
        ));

        let report = scanner.scan_once().await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_notify_failure_does_not_stop_scan() {
        let source = MockSource::new(&[
            ("BNB/USDT", candles(&BULLISH)),
            ("ETH/USDT", candles(&BEARISH)),
        ]);
        let notifier = MockNotifier {
            fail: true,
            ..Default::default()
        };
        let scanner = Scanner::new(source, notifier, config(&["BNB/USDT", "ETH/USDT"]));

        let report = scanner.scan_once().await;
        assert_eq!(report.scanned, 2);
        assert_eq!(report.notify_failures, 2);
        assert_eq!(scanner.notifier.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_no_divergence_sends_nothing() {
        let flat = vec![100.0; 18];
        let source = MockSource::new(&[("ADA/USDT", candles(&flat))]);
        let scanner = Scanner::new(source, MockNotifier::default(), config(&["ADA/USDT"]));

        let report = scanner.scan_once().await;
        assert_eq!(report.scanned, 1);
        assert!(report.alerts.is_empty());
        assert!(scanner.notifier.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_until_scans_immediately() {
        let source = MockSource::new(&[("BNB/USDT", candles(&BULLISH))]);
        let scanner = Scanner::new(
            source,
            MockNotifier::default(),
            config(&["BNB/USDT", "ETH/USDT"]),
        );

        scanner
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await;

        assert_eq!(scanner.source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(scanner.notifier.sent.lock().await.len(), 1);
    }
}
