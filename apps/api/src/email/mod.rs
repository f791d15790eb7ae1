//! Outbound email — fire-and-forget dispatch behind a `Mailer` trait.
//!
//! Delivery is best-effort: the triggering operation succeeds regardless of
//! the email outcome, and failures are only logged. Transport is an HTTP
//! mail API when configured, a log line otherwise.

pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Posts messages to an HTTP mail-API endpoint (Resend-style JSON body).
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let mut request = self.client.post(&self.endpoint).json(&json!({
            "from": self.from,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail API returned {status}: {body}");
        }
        Ok(())
    }
}

/// Stand-in mailer for deployments without a mail API (and for tests):
/// logs the would-be delivery and reports success.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        info!(to = %message.to, subject = %message.subject, "email suppressed (no mail API configured)");
        Ok(())
    }
}

/// Queues a message for delivery after the current response is sent.
/// Failure is logged, never surfaced to the caller.
pub fn dispatch(mailer: Arc<dyn Mailer>, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&message).await {
            warn!(to = %message.to, subject = %message.subject, "email dispatch failed: {e:#}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_mailer_always_succeeds() {
        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "hi".to_string(),
            html: "<p>hi</p>".to_string(),
        };
        assert!(NoopMailer.send(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block_or_panic() {
        let mailer: Arc<dyn Mailer> = Arc::new(NoopMailer);
        dispatch(
            mailer,
            EmailMessage {
                to: "user@example.com".to_string(),
                subject: "hi".to_string(),
                html: String::new(),
            },
        );
        // Let the spawned task run to completion.
        tokio::task::yield_now().await;
    }
}
