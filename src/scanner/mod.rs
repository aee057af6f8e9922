//! Scan orchestration module
//!
//! Runs the divergence check over every configured instrument, one at a
//! time, and hands detected alerts to the notifier.

mod orchestrator;
mod types;

pub use orchestrator::Scanner;
pub use types::{ScanError, ScanReport, ScannerConfig};
