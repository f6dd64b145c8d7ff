//! Types for issue tracker operations.

use async_trait::async_trait;
use thiserror::Error;

use crate::resolver::TicketKey;

/// Structured comment document in the tracker's rich-text format.
pub type CommentDoc = serde_json::Value;

/// Errors that can occur during tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("No transition named '{name}' available on {issue}")]
    TransitionNotFound { issue: String, name: String },

    #[error("No version matching prefix '{0}'")]
    VersionNotFound(String),

    #[error("No user matching '{0}'")]
    UserNotFound(String),

    #[error("No active sprint on board {0}")]
    NoActiveSprint(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Request to create a new issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    pub component: Option<String>,
    pub assignee_id: Option<String>,
}

impl CreateIssueRequest {
    /// Create a request with the required fields.
    pub fn new(
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            issue_type: issue_type.into(),
            summary: summary.into(),
            component: None,
            assignee_id: None,
        }
    }

    /// Attach a component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Assign the new issue to a tracker user id.
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }
}

/// A newly created issue.
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    pub key: TicketKey,
}

/// An agile board sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
}

/// Trait for issue tracker backends.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the human-readable summary of an issue.
    async fn get_issue_summary(&self, key: &TicketKey) -> Result<String, TrackerError>;

    /// Resolve a version id by name prefix.
    async fn get_version_id_by_prefix(&self, prefix: &str) -> Result<String, TrackerError>;

    /// Attach a fix version to an issue.
    async fn set_fix_version(
        &self,
        key: &TicketKey,
        version_id: &str,
    ) -> Result<(), TrackerError>;

    /// Post a structured comment on an issue.
    async fn post_comment(&self, key: &TicketKey, doc: &CommentDoc) -> Result<(), TrackerError>;

    /// Create a new issue.
    async fn create_issue(
        &self,
        request: CreateIssueRequest,
    ) -> Result<CreatedIssue, TrackerError>;

    /// Fuzzy-match a display name to a tracker user id.
    async fn get_user_id_by_fuzzy_name(&self, name: &str) -> Result<String, TrackerError>;

    /// Whether the issue was created by the credentials this client runs as.
    async fn was_created_by_me(&self, key: &TicketKey) -> Result<bool, TrackerError>;

    /// Apply a workflow transition by name.
    async fn transition_issue(
        &self,
        key: &TicketKey,
        transition_name: &str,
    ) -> Result<(), TrackerError>;

    /// Assign an issue to a tracker user id.
    async fn assign_issue(&self, key: &TicketKey, account_id: &str) -> Result<(), TrackerError>;

    /// Fetch the reporter's user id for an issue.
    async fn get_issue_reporter_id(&self, key: &TicketKey) -> Result<String, TrackerError>;

    /// Fetch the active sprint of a board.
    async fn get_active_sprint(&self, board_id: u64) -> Result<Sprint, TrackerError>;

    /// Move issues into a sprint.
    async fn move_issues_to_sprint(
        &self,
        keys: &[TicketKey],
        sprint_id: u64,
    ) -> Result<(), TrackerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issue_request_builder() {
        let request = CreateIssueRequest::new("AB", "Task", "Fix login bug")
            .with_component("backend")
            .with_assignee("acc-1");

        assert_eq!(request.project_key, "AB");
        assert_eq!(request.issue_type, "Task");
        assert_eq!(request.summary, "Fix login bug");
        assert_eq!(request.component.as_deref(), Some("backend"));
        assert_eq!(request.assignee_id.as_deref(), Some("acc-1"));
    }

    #[test]
    fn test_create_issue_request_defaults() {
        let request = CreateIssueRequest::new("AB", "Bug", "s");
        assert!(request.component.is_none());
        assert!(request.assignee_id.is_none());
    }
}
