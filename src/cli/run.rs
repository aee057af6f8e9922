//! Run command implementation

use crate::config::Config;
use crate::feed::BinanceKlines;
use crate::notify::FonnteNotifier;
use crate::scanner::{Scanner, ScannerConfig};
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the scan interval (seconds)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let notifier = FonnteNotifier::new(config.fonnte()?)?;
        let source = BinanceKlines::new()?;

        let mut scanner_config = ScannerConfig::from(config);
        if let Some(secs) = self.interval.filter(|s| *s > 0) {
            scanner_config.interval = std::time::Duration::from_secs(secs);
        }

        let scanner = Scanner::new(source, notifier, scanner_config);
        scanner
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            })
            .await;

        Ok(())
    }
}
