//! Single scan command implementation

use crate::config::Config;
use crate::feed::BinanceKlines;
use crate::notify::{FonnteNotifier, LogNotifier, Notifier};
use crate::scanner::{ScanReport, Scanner, ScannerConfig};
use clap::Args;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Scan only these instruments (repeatable)
    #[arg(long = "symbol")]
    pub symbols: Vec<String>,
}

impl ScanArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut scanner_config = ScannerConfig::from(config);
        if !self.symbols.is_empty() {
            scanner_config.symbols = self.symbols.clone();
        }

        let source = BinanceKlines::new()?;
        let report = if self.dry_run {
            Self::scan(source, LogNotifier, scanner_config).await
        } else {
            let notifier = FonnteNotifier::new(config.fonnte()?)?;
            Self::scan(source, notifier, scanner_config).await
        };

        print_report(&report);
        Ok(())
    }

    async fn scan<N: Notifier>(
        source: BinanceKlines,
        notifier: N,
        config: ScannerConfig,
    ) -> ScanReport {
        Scanner::new(source, notifier, config).scan_once().await
    }
}

fn print_report(report: &ScanReport) {
    println!("Scan complete");
    println!("  Scanned: {}", report.scanned);
    println!("  Failed: {}", report.failed);
    println!("  Alerts: {}", report.alerts.len());
    for alert in &report.alerts {
        println!("    {}", alert);
    }
    if report.notify_failures > 0 {
        println!("  Undelivered: {}", report.notify_failures);
    }
}
