//! Types for the reconciliation engine.

use thiserror::Error;

use crate::resolver::{KeySource, TicketKey};

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required configuration missing for the selected mode.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracker error.
    #[error("tracker error: {0}")]
    Tracker(#[from] crate::tracker::TrackerError),

    /// Repository host error.
    #[error("repository host error: {0}")]
    RepoHost(#[from] crate::repo_host::RepoHostError),

    /// Webhook delivery error.
    #[error("webhook error: {0}")]
    Notify(#[from] crate::webhook::NotifyError),
}

/// Terminal result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// All applicable actions were performed.
    Completed,
    /// The run ended early on a valid no-op path.
    Skipped {
        reason: String,
    },
}

/// Ticket identity threaded from key resolution, through the optional
/// creation step, into the shared tail. Once resolved it is never
/// re-resolved within the same run.
#[derive(Debug, Clone)]
pub struct ResolvedTicket {
    pub key: TicketKey,
    pub source: KeySource,
    /// Human-readable summary for link text; best-effort, may be absent.
    pub summary: Option<String>,
}

impl ResolvedTicket {
    /// Whether the key was already present in the pull request title.
    pub fn key_in_title(&self) -> bool {
        self.source == KeySource::Title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_in_title() {
        let ticket = ResolvedTicket {
            key: TicketKey::new("AB-1"),
            source: KeySource::Title,
            summary: None,
        };
        assert!(ticket.key_in_title());

        let ticket = ResolvedTicket {
            key: TicketKey::new("AB-1"),
            source: KeySource::Branch,
            summary: None,
        };
        assert!(!ticket.key_in_title());
    }
}
