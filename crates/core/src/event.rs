//! Pull request event payload types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading the triggering event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to parse event payload: {0}")]
    Parse(String),
}

/// Immutable snapshot of the pull request that triggered this run.
///
/// The engine never mutates it; changes to the remote pull request are
/// expressed as a [`PullRequestUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// Pull request number within the repository.
    pub number: u64,
    /// Title as carried by the event payload (may be stale, see the engine).
    pub title: String,
    /// Body as carried by the event payload.
    pub body: Option<String>,
    /// Name of the head branch.
    pub head_branch: String,
    /// Whether the pull request was merged when the event fired.
    pub merged: bool,
    /// Web URL of the pull request.
    pub html_url: String,
    /// Login of the user that triggered the event.
    pub author_login: String,
}

impl PullRequestEvent {
    /// Parse the repository host's raw event payload (the JSON document the
    /// CI runner writes to disk for the triggering event).
    pub fn from_event_json(raw: &str) -> Result<Self, EventError> {
        let event: RawEvent =
            serde_json::from_str(raw).map_err(|e| EventError::Parse(e.to_string()))?;
        let pr = event.pull_request;
        Ok(Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            head_branch: pr.head.branch,
            merged: pr.merged,
            html_url: pr.html_url,
            author_login: pr.user.login,
        })
    }
}

/// Partial update to apply to the remote pull request.
///
/// Fields left as `None` are not serialized, so the host leaves them
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PullRequestUpdate {
    /// True when the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

// Raw payload shape as emitted by the repository host.
#[derive(Debug, Deserialize)]
struct RawEvent {
    pull_request: RawPullRequest,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    head: RawRef,
    #[serde(default)]
    merged: bool,
    html_url: String,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}
