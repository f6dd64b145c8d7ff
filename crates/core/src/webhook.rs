//! Outbound webhook notification.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::event::PullRequestEvent;
use crate::resolver::TicketKey;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while delivering a webhook notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Payload delivered to the configured webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub issues: Vec<TicketKey>,
    pub pr: PullRequestEvent,
}

/// Trait for webhook notifier backends.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Deliver the payload. Fire-and-forget: the response body is ignored.
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifyError>;
}

/// HTTP POST webhook notifier.
pub struct HttpNotifier {
    client: Client,
}

impl Default for HttpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpNotifier {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        debug!(url = url, "Posting webhook notification");
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else if e.is_connect() {
                    NotifyError::ConnectionFailed(e.to_string())
                } else {
                    NotifyError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::ApiError(format!("HTTP {status}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serialization() {
        let payload = WebhookPayload {
            issues: vec![TicketKey::new("AB-42")],
            pr: PullRequestEvent {
                number: 42,
                title: "Fix login bug AB-42".to_string(),
                body: None,
                head_branch: "fix/login".to_string(),
                merged: false,
                html_url: "https://github.com/acme/app/pull/42".to_string(),
                author_login: "octocat".to_string(),
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["issues"][0], "AB-42");
        assert_eq!(json["pr"]["number"], 42);
        assert_eq!(json["pr"]["merged"], false);
    }
}
