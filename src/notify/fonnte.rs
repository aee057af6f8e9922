//! Fonnte WhatsApp gateway client
//!
//! The gateway takes `token`, `target` and `message` as query parameters on
//! a GET request. Each target is sent separately.

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default Fonnte send endpoint
pub const FONNTE_API_URL: &str = "https://api.fonnte.com/send";

/// Configuration for the Fonnte client
#[derive(Debug, Clone)]
pub struct FonnteConfig {
    /// Send endpoint
    pub endpoint: String,
    /// API token
    pub token: String,
    /// Recipient phone numbers or group ids
    pub targets: Vec<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl FonnteConfig {
    pub fn new(token: impl Into<String>, targets: Vec<String>) -> Self {
        Self {
            endpoint: FONNTE_API_URL.to_string(),
            token: token.into(),
            targets,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Notifier backed by the Fonnte gateway
pub struct FonnteNotifier {
    config: FonnteConfig,
    client: Client,
}

impl FonnteNotifier {
    pub fn new(config: FonnteConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Number of configured recipients
    pub fn target_count(&self) -> usize {
        self.config.targets.len()
    }

    async fn send_to(&self, target: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("token", self.config.token.as_str()),
                ("target", target),
                ("message", message),
            ])
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(NotifyError::Rejected {
                target: target.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(reply) => tracing::debug!(recipient = %target, %reply, "Fonnte response"),
            Err(_) => {
                tracing::debug!(recipient = %target, body = %body, "Fonnte response (non-JSON)")
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for FonnteNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let total = self.config.targets.len();
        let mut failed = 0;

        for target in &self.config.targets {
            match self.send_to(target, message).await {
                Ok(()) => {
                    tracing::info!(recipient = %target, alert = %message, "Sent WhatsApp message")
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        recipient = %target,
                        error = %e,
                        "Error sending WhatsApp message"
                    );
                }
            }
        }

        if failed > 0 {
            return Err(NotifyError::Delivery { failed, total });
        }
        Ok(())
    }
}
