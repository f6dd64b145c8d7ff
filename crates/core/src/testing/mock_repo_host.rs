//! Mock repository host for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::event::PullRequestUpdate;
use crate::repo_host::{PullRequestSnapshot, RepoHost, RepoHostError, UserProfile};

/// Mock implementation of the RepoHost trait.
///
/// Serves a configurable pull request snapshot, records updates for
/// assertions, and can simulate failures.
pub struct MockRepoHost {
    snapshot: RwLock<PullRequestSnapshot>,
    display_name: RwLock<Option<String>>,
    updates: RwLock<Vec<(u64, PullRequestUpdate)>>,
    fetch_count: RwLock<u32>,
    fail_fetch_user: RwLock<bool>,
    next_error: RwLock<Option<RepoHostError>>,
}

impl MockRepoHost {
    /// Create a mock host serving the given pull request state.
    pub fn new(title: impl Into<String>, body: Option<&str>) -> Self {
        Self {
            snapshot: RwLock::new(PullRequestSnapshot {
                title: title.into(),
                body: body.map(str::to_string),
            }),
            display_name: RwLock::new(None),
            updates: RwLock::new(Vec::new()),
            fetch_count: RwLock::new(0),
            fail_fetch_user: RwLock::new(false),
            next_error: RwLock::new(None),
        }
    }

    /// Replace the served snapshot (e.g. to simulate a previous run's edit).
    pub async fn set_snapshot(&self, title: impl Into<String>, body: Option<&str>) {
        *self.snapshot.write().await = PullRequestSnapshot {
            title: title.into(),
            body: body.map(str::to_string),
        };
    }

    /// Configure the display name served by `fetch_user`.
    pub async fn set_display_name(&self, name: impl Into<String>) {
        *self.display_name.write().await = Some(name.into());
    }

    /// Make the next `fetch_pull_request` fail with the given error.
    pub async fn set_next_error(&self, error: RepoHostError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make `fetch_user` fail.
    pub async fn set_fail_fetch_user(&self, fail: bool) {
        *self.fail_fetch_user.write().await = fail;
    }

    /// Recorded pull request updates.
    pub async fn updates(&self) -> Vec<(u64, PullRequestUpdate)> {
        self.updates.read().await.clone()
    }

    /// Number of updates applied.
    pub async fn update_count(&self) -> usize {
        self.updates.read().await.len()
    }

    /// Number of pull request fetches served.
    pub async fn fetch_count(&self) -> u32 {
        *self.fetch_count.read().await
    }
}

#[async_trait]
impl RepoHost for MockRepoHost {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_pull_request(
        &self,
        _number: u64,
    ) -> Result<PullRequestSnapshot, RepoHostError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        *self.fetch_count.write().await += 1;
        Ok(self.snapshot.read().await.clone())
    }

    async fn update_pull_request(
        &self,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<(), RepoHostError> {
        self.updates.write().await.push((number, update.clone()));
        Ok(())
    }

    async fn fetch_user(&self, login: &str) -> Result<UserProfile, RepoHostError> {
        if *self.fail_fetch_user.read().await {
            return Err(RepoHostError::UserNotFound(login.to_string()));
        }
        Ok(UserProfile {
            login: login.to_string(),
            display_name: self.display_name.read().await.clone(),
        })
    }
}
