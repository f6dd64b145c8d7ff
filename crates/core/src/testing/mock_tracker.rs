//! Mock tracker for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::resolver::TicketKey;
use crate::tracker::{
    CommentDoc, CreateIssueRequest, CreatedIssue, Sprint, Tracker, TrackerError,
};

/// Mock implementation of the Tracker trait.
///
/// Provides controllable behavior for testing:
/// - Configurable lookup results (summary, version, user, sprint)
/// - Recorded mutations (comments, transitions, assignments, creations)
/// - Simulated failures for the best-effort paths
pub struct MockTracker {
    summary: RwLock<Option<String>>,
    fail_summary: RwLock<bool>,
    version_id: RwLock<Option<String>>,
    user_id: RwLock<Option<String>>,
    created_key: RwLock<String>,
    created_by_me: RwLock<bool>,
    reporter_id: RwLock<String>,
    active_sprint: RwLock<Option<Sprint>>,
    comments: RwLock<Vec<(TicketKey, CommentDoc)>>,
    transitions: RwLock<Vec<(TicketKey, String)>>,
    assignments: RwLock<Vec<(TicketKey, String)>>,
    fix_versions: RwLock<Vec<(TicketKey, String)>>,
    created_requests: RwLock<Vec<CreateIssueRequest>>,
    sprint_moves: RwLock<Vec<(Vec<TicketKey>, u64)>>,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    /// Create a new mock tracker with empty state.
    pub fn new() -> Self {
        Self {
            summary: RwLock::new(None),
            fail_summary: RwLock::new(false),
            version_id: RwLock::new(None),
            user_id: RwLock::new(None),
            created_key: RwLock::new("MOCK-1".to_string()),
            created_by_me: RwLock::new(true),
            reporter_id: RwLock::new("reporter-1".to_string()),
            active_sprint: RwLock::new(None),
            comments: RwLock::new(Vec::new()),
            transitions: RwLock::new(Vec::new()),
            assignments: RwLock::new(Vec::new()),
            fix_versions: RwLock::new(Vec::new()),
            created_requests: RwLock::new(Vec::new()),
            sprint_moves: RwLock::new(Vec::new()),
        }
    }

    /// Set the summary returned for any issue.
    pub async fn set_summary(&self, summary: impl Into<String>) {
        *self.summary.write().await = Some(summary.into());
    }

    /// Make summary lookups fail.
    pub async fn set_fail_summary(&self, fail: bool) {
        *self.fail_summary.write().await = fail;
    }

    /// Set the version id resolved by prefix lookups.
    pub async fn set_version_id(&self, id: impl Into<String>) {
        *self.version_id.write().await = Some(id.into());
    }

    /// Set the account id returned by fuzzy user lookups.
    pub async fn set_user_id(&self, id: impl Into<String>) {
        *self.user_id.write().await = Some(id.into());
    }

    /// Set the key assigned to the next created issue.
    pub async fn set_created_key(&self, key: impl Into<String>) {
        *self.created_key.write().await = key.into();
    }

    /// Set whether issues read as created by the automation's identity.
    pub async fn set_created_by_me(&self, created_by_me: bool) {
        *self.created_by_me.write().await = created_by_me;
    }

    /// Set the reporter account id.
    pub async fn set_reporter_id(&self, id: impl Into<String>) {
        *self.reporter_id.write().await = id.into();
    }

    /// Set the active sprint served for any board.
    pub async fn set_active_sprint(&self, sprint: Sprint) {
        *self.active_sprint.write().await = Some(sprint);
    }

    /// Recorded comments.
    pub async fn comments(&self) -> Vec<(TicketKey, CommentDoc)> {
        self.comments.read().await.clone()
    }

    /// Recorded transitions.
    pub async fn transitions(&self) -> Vec<(TicketKey, String)> {
        self.transitions.read().await.clone()
    }

    /// Recorded assignments.
    pub async fn assignments(&self) -> Vec<(TicketKey, String)> {
        self.assignments.read().await.clone()
    }

    /// Recorded fix version attachments.
    pub async fn fix_versions(&self) -> Vec<(TicketKey, String)> {
        self.fix_versions.read().await.clone()
    }

    /// Recorded issue creations.
    pub async fn created_requests(&self) -> Vec<CreateIssueRequest> {
        self.created_requests.read().await.clone()
    }

    /// Recorded sprint moves.
    pub async fn sprint_moves(&self) -> Vec<(Vec<TicketKey>, u64)> {
        self.sprint_moves.read().await.clone()
    }

    /// Total number of recorded mutations.
    pub async fn mutation_count(&self) -> usize {
        self.comments.read().await.len()
            + self.transitions.read().await.len()
            + self.assignments.read().await.len()
            + self.fix_versions.read().await.len()
            + self.created_requests.read().await.len()
            + self.sprint_moves.read().await.len()
    }
}

#[async_trait]
impl Tracker for MockTracker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_issue_summary(&self, key: &TicketKey) -> Result<String, TrackerError> {
        if *self.fail_summary.read().await {
            return Err(TrackerError::ApiError("summary lookup failed".to_string()));
        }
        self.summary
            .read()
            .await
            .clone()
            .ok_or_else(|| TrackerError::IssueNotFound(key.to_string()))
    }

    async fn get_version_id_by_prefix(&self, prefix: &str) -> Result<String, TrackerError> {
        self.version_id
            .read()
            .await
            .clone()
            .ok_or_else(|| TrackerError::VersionNotFound(prefix.to_string()))
    }

    async fn set_fix_version(
        &self,
        key: &TicketKey,
        version_id: &str,
    ) -> Result<(), TrackerError> {
        self.fix_versions
            .write()
            .await
            .push((key.clone(), version_id.to_string()));
        Ok(())
    }

    async fn post_comment(&self, key: &TicketKey, doc: &CommentDoc) -> Result<(), TrackerError> {
        self.comments.write().await.push((key.clone(), doc.clone()));
        Ok(())
    }

    async fn create_issue(
        &self,
        request: CreateIssueRequest,
    ) -> Result<CreatedIssue, TrackerError> {
        self.created_requests.write().await.push(request);
        Ok(CreatedIssue {
            key: TicketKey::new(self.created_key.read().await.clone()),
        })
    }

    async fn get_user_id_by_fuzzy_name(&self, name: &str) -> Result<String, TrackerError> {
        self.user_id
            .read()
            .await
            .clone()
            .ok_or_else(|| TrackerError::UserNotFound(name.to_string()))
    }

    async fn was_created_by_me(&self, _key: &TicketKey) -> Result<bool, TrackerError> {
        Ok(*self.created_by_me.read().await)
    }

    async fn transition_issue(
        &self,
        key: &TicketKey,
        transition_name: &str,
    ) -> Result<(), TrackerError> {
        self.transitions
            .write()
            .await
            .push((key.clone(), transition_name.to_string()));
        Ok(())
    }

    async fn assign_issue(&self, key: &TicketKey, account_id: &str) -> Result<(), TrackerError> {
        self.assignments
            .write()
            .await
            .push((key.clone(), account_id.to_string()));
        Ok(())
    }

    async fn get_issue_reporter_id(&self, _key: &TicketKey) -> Result<String, TrackerError> {
        Ok(self.reporter_id.read().await.clone())
    }

    async fn get_active_sprint(&self, board_id: u64) -> Result<Sprint, TrackerError> {
        self.active_sprint
            .read()
            .await
            .clone()
            .ok_or(TrackerError::NoActiveSprint(board_id))
    }

    async fn move_issues_to_sprint(
        &self,
        keys: &[TicketKey],
        sprint_id: u64,
    ) -> Result<(), TrackerError> {
        self.sprint_moves
            .write()
            .await
            .push((keys.to_vec(), sprint_id));
        Ok(())
    }
}
