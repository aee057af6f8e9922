//! CLI interface for divergence-scanner
//!
//! Provides subcommands for:
//! - `run`: Scan continuously on the configured interval
//! - `scan`: Run a single scan pass
//! - `analyze`: Print the divergence analysis for one instrument
//! - `config`: Show the effective configuration

mod analyze;
mod run;
mod scan;

pub use analyze::AnalyzeArgs;
pub use run::RunArgs;
pub use scan::ScanArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "divergence-scanner")]
#[command(about = "RSI divergence scanner for crypto pairs with WhatsApp alerts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan continuously until interrupted
    Run(RunArgs),
    /// Run a single scan pass
    Scan(ScanArgs),
    /// Analyse one instrument and print the result as JSON
    Analyze(AnalyzeArgs),
    /// Show configuration
    Config,
}
