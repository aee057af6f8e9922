//! Notification module
//!
//! Delivers alert text through the Fonnte WhatsApp gateway

mod fonnte;
mod types;

pub use fonnte::{FonnteConfig, FonnteNotifier, FONNTE_API_URL};
pub use types::{LogNotifier, NotifyError};

use async_trait::async_trait;

/// Trait for outbound message sinks
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message to every configured recipient
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}
