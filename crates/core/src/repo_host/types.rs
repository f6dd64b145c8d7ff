//! Types for repository host operations.

use async_trait::async_trait;
use thiserror::Error;

use crate::event::PullRequestUpdate;

/// Errors that can occur during repository host operations.
#[derive(Debug, Error)]
pub enum RepoHostError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Pull request not found: #{0}")]
    PullRequestNotFound(u64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Current title and body of a pull request as stored by the host.
///
/// The event payload may be stale if the pull request was edited after the
/// event fired; this snapshot is authoritative.
#[derive(Debug, Clone)]
pub struct PullRequestSnapshot {
    pub title: String,
    pub body: Option<String>,
}

/// A user profile on the repository host.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub login: String,
    /// Human-readable name; hosts allow this to be unset.
    pub display_name: Option<String>,
}

/// Trait for repository host backends.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the current state of a pull request.
    async fn fetch_pull_request(&self, number: u64)
        -> Result<PullRequestSnapshot, RepoHostError>;

    /// Apply a partial update to a pull request. Fields the update leaves
    /// unset remain unchanged on the host.
    async fn update_pull_request(
        &self,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<(), RepoHostError>;

    /// Fetch a user profile by login.
    async fn fetch_user(&self, login: &str) -> Result<UserProfile, RepoHostError>;
}
