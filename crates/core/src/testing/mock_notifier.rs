//! Mock webhook notifier for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::webhook::{Notifier, NotifyError, WebhookPayload};

/// Mock implementation of the Notifier trait.
///
/// Records delivered payloads and can simulate a delivery failure.
pub struct MockNotifier {
    notifications: RwLock<Vec<(String, WebhookPayload)>>,
    next_error: RwLock<Option<NotifyError>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Create a new mock notifier.
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
        }
    }

    /// Make the next delivery fail with the given error.
    pub async fn set_next_error(&self, error: NotifyError) {
        *self.next_error.write().await = Some(error);
    }

    /// Recorded notifications.
    pub async fn notifications(&self) -> Vec<(String, WebhookPayload)> {
        self.notifications.read().await.clone()
    }

    /// Number of notifications delivered.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        self.notifications
            .write()
            .await
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}
