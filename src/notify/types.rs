//! Notification types

use super::Notifier;
use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Gateway answered with a non-success status
    #[error("Gateway rejected message for {target}: {status} {body}")]
    Rejected {
        target: String,
        status: u16,
        body: String,
    },
    /// Some recipients did not receive the message
    #[error("Delivery failed for {failed} of {total} targets")]
    Delivery { failed: usize, total: usize },
}

/// Sink that only logs messages (dry runs)
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(alert = %message, "Alert (dry run, not sent)");
        Ok(())
    }
}
