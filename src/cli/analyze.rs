//! Analyze command implementation

use crate::config::Config;
use crate::feed::BinanceKlines;
use crate::notify::LogNotifier;
use crate::scanner::{Scanner, ScannerConfig};
use clap::Args;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Instrument, e.g. BNB/USDT
    pub symbol: String,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let scanner = Scanner::new(
            BinanceKlines::new()?,
            LogNotifier,
            ScannerConfig::from(config),
        );

        let (divergence, alerts) = scanner.scan_symbol(&self.symbol).await?;

        println!("{}", serde_json::to_string_pretty(&divergence)?);
        for alert in alerts {
            println!("{}", alert);
        }
        Ok(())
    }
}
