//! Scan metrics

use crate::divergence::DivergenceKind;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum ScanMetric {
    /// Completed scan passes
    ScanCompleted,
    /// Instruments analysed successfully
    SymbolScanned,
    /// Instruments skipped after a fetch or data error
    SymbolFailed,
    /// Alerts the notifier could not deliver
    NotifyFailed,
}

/// Increment a scan counter
pub fn increment(metric: ScanMetric) {
    let metric_name = match metric {
        ScanMetric::ScanCompleted => "divergence_scans_total",
        ScanMetric::SymbolScanned => "divergence_symbols_scanned_total",
        ScanMetric::SymbolFailed => "divergence_symbols_failed_total",
        ScanMetric::NotifyFailed => "divergence_notify_failures_total",
    };

    ::metrics::counter!(metric_name).increment(1);
}

/// Count a detected divergence by kind
pub fn record_alert(kind: DivergenceKind) {
    ::metrics::counter!("divergence_alerts_total", "kind" => kind.label()).increment(1);
}

/// Record how long a full scan pass took
pub fn record_scan_duration(duration: Duration) {
    ::metrics::histogram!("divergence_scan_duration_seconds").record(duration.as_secs_f64());
    tracing::debug!(
        value_ms = duration.as_millis() as u64,
        "Recording scan duration"
    );
}
