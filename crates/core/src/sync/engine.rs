//! The reconciliation engine.
//!
//! One invocation per triggering event: resolve a ticket key from the pull
//! request title or head branch, then perform the configured
//! synchronization actions. Collaborator calls are awaited strictly in
//! sequence; later decisions depend on earlier results.

use std::sync::Arc;

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::config::{Config, WebhookConfig};
use crate::description::{format_link, insert_link};
use crate::event::{PullRequestEvent, PullRequestUpdate};
use crate::repo_host::RepoHost;
use crate::resolver::{resolve_key, KeySource};
use crate::title::compose_title;
use crate::tracker::{comment::linked_pr_document, CreateIssueRequest, Tracker};
use crate::transition::choose_transition;
use crate::webhook::{Notifier, WebhookPayload};

use super::types::{ResolvedTicket, SyncError, SyncOutcome};

const NO_KEY_REASON: &str = "no ticket key resolved";

/// The reconciliation engine - performs one synchronization pass.
pub struct Reconciler {
    config: Config,
    repo_host: Arc<dyn RepoHost>,
    /// Present only when tracker credentials are configured; gates every
    /// tracker call.
    tracker: Option<Arc<dyn Tracker>>,
    notifier: Arc<dyn Notifier>,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        config: Config,
        repo_host: Arc<dyn RepoHost>,
        tracker: Option<Arc<dyn Tracker>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            repo_host,
            tracker,
            notifier,
        }
    }

    /// Run one reconciliation pass for the triggering event.
    ///
    /// Repeated invocations for the same pull request are safe: actions are
    /// either naturally idempotent or redone identically (a re-run inserts
    /// the link text again rather than deduplicating).
    pub async fn run(&self, event: &PullRequestEvent) -> Result<SyncOutcome, SyncError> {
        // The event payload may carry a stale title if the pull request was
        // edited after the event fired; the host is authoritative.
        let snapshot = self.repo_host.fetch_pull_request(event.number).await?;
        let title = snapshot.title;
        let body = snapshot.body;

        let mut ticket =
            resolve_key(&title, &event.head_branch).map(|(key, source)| ResolvedTicket {
                key,
                source,
                summary: None,
            });

        match &ticket {
            Some(t) => info!(key = %t.key, source = ?t.source, "Ticket key resolved"),
            None => debug!("No ticket key in title or branch"),
        }

        // Best-effort: the summary only enriches link text.
        if let (Some(t), Some(tracker)) = (ticket.as_mut(), self.tracker.as_deref()) {
            match tracker.get_issue_summary(&t.key).await {
                Ok(summary) => t.summary = Some(summary),
                Err(e) => warn!(key = %t.key, error = %e, "Failed to fetch issue summary"),
            }
        }

        if let Some(webhook) = &self.config.webhook {
            return self
                .run_webhook_mode(webhook, event, &title, body.as_deref(), ticket.as_ref())
                .await;
        }

        if self.config.sync.only_append_description {
            return self
                .run_append_mode(event, body.as_deref(), ticket.as_ref())
                .await;
        }

        if self.config.sync.create_issue {
            if let Some(t) = &ticket {
                info!(key = %t.key, "Ticket already exists, skipping issue creation");
                return Ok(SyncOutcome::Skipped {
                    reason: format!("ticket {} already exists", t.key),
                });
            }
            let created = self.create_issue(event, &title).await?;
            return self
                .run_shared_tail(event, &title, body.as_deref(), Some(created))
                .await;
        }

        self.run_shared_tail(event, &title, body.as_deref(), ticket)
            .await
    }

    /// Webhook-relay mode: notify the webhook, then either attach the fix
    /// version (merge) or update the pull request and comment (open).
    async fn run_webhook_mode(
        &self,
        webhook: &WebhookConfig,
        event: &PullRequestEvent,
        title: &str,
        body: Option<&str>,
        ticket: Option<&ResolvedTicket>,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(ticket) = ticket else {
            info!("No ticket key in title or branch, skipping webhook relay");
            return Ok(SyncOutcome::Skipped {
                reason: NO_KEY_REASON.to_string(),
            });
        };

        let payload = WebhookPayload {
            issues: vec![ticket.key.clone()],
            pr: event.clone(),
        };
        self.notifier.notify(&webhook.url, &payload).await?;
        info!(key = %ticket.key, url = %webhook.url, "Webhook notified");

        if event.merged {
            // Merge events stop here: no pull request update, no comment.
            if self.config.sync.add_fix_version_on_merge {
                self.attach_fix_version(ticket).await?;
            }
            return Ok(SyncOutcome::Completed);
        }

        let update = self.build_update(title, body, ticket);
        self.repo_host
            .update_pull_request(event.number, &update)
            .await?;
        info!(key = %ticket.key, "Pull request updated");

        if let Some(tracker) = self.tracker.as_deref() {
            tracker
                .post_comment(&ticket.key, &linked_pr_document(title, &event.html_url))
                .await?;
            debug!(key = %ticket.key, "Linked pull request comment posted");
        }

        Ok(SyncOutcome::Completed)
    }

    /// Append-description-only mode: rewrite the body, never the title.
    async fn run_append_mode(
        &self,
        event: &PullRequestEvent,
        body: Option<&str>,
        ticket: Option<&ResolvedTicket>,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(ticket) = ticket else {
            info!("No ticket key in title or branch, nothing to append");
            return Ok(SyncOutcome::Skipped {
                reason: NO_KEY_REASON.to_string(),
            });
        };

        let pattern = self.compiled_append_pattern()?;
        let link = format_link(
            &self.config.tracker.host,
            &ticket.key,
            ticket.summary.as_deref(),
        );
        let update = PullRequestUpdate {
            title: None,
            body: Some(insert_link(body, &link, pattern.as_ref())),
        };
        self.repo_host
            .update_pull_request(event.number, &update)
            .await?;
        info!(key = %ticket.key, "Description updated");

        Ok(SyncOutcome::Completed)
    }

    /// Create a tracker issue for a pull request with no associated ticket,
    /// adopting the new key for the shared tail.
    async fn create_issue(
        &self,
        event: &PullRequestEvent,
        title: &str,
    ) -> Result<ResolvedTicket, SyncError> {
        let tracker = self.tracker.as_deref().ok_or_else(|| {
            SyncError::InvalidConfig("sync.create_issue requires tracker credentials".to_string())
        })?;
        let project_key = self
            .config
            .project
            .key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                SyncError::InvalidConfig("sync.create_issue requires project.key".to_string())
            })?;
        let issue_type = self
            .config
            .project
            .issue_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SyncError::InvalidConfig(
                    "sync.create_issue requires project.issue_type".to_string(),
                )
            })?;

        let assignee_id = self.lookup_assignee(tracker, &event.author_login).await;

        let mut request = CreateIssueRequest::new(project_key, issue_type, title);
        if let Some(component) = &self.config.project.component {
            request = request.with_component(component);
        }
        if let Some(assignee_id) = assignee_id {
            request = request.with_assignee(assignee_id);
        }

        let created = tracker.create_issue(request).await?;
        info!(key = %created.key, "Tracker issue created");

        if let Some(board_id) = self.config.project.board_id {
            let sprint = tracker.get_active_sprint(board_id).await?;
            tracker
                .move_issues_to_sprint(std::slice::from_ref(&created.key), sprint.id)
                .await?;
            info!(key = %created.key, sprint = sprint.id, "Issue moved into active sprint");
        }

        Ok(ResolvedTicket {
            key: created.key,
            source: KeySource::Created,
            // The pull request title doubles as the new issue's summary.
            summary: Some(title.to_string()),
        })
    }

    /// Best-effort author-to-assignee resolution; failure degrades to an
    /// unassigned issue.
    async fn lookup_assignee(&self, tracker: &dyn Tracker, login: &str) -> Option<String> {
        let profile = match self.repo_host.fetch_user(login).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(login = login, error = %e, "Failed to fetch author profile, creating issue unassigned");
                return None;
            }
        };
        let name = profile.display_name.unwrap_or(profile.login);
        match tracker.get_user_id_by_fuzzy_name(&name).await {
            Ok(account_id) => Some(account_id),
            Err(e) => {
                warn!(name = %name, error = %e, "No tracker user matched author, creating issue unassigned");
                None
            }
        }
    }

    /// Shared tail of create-issue and full-sync modes: transition, assign,
    /// comment, and update the pull request.
    async fn run_shared_tail(
        &self,
        event: &PullRequestEvent,
        title: &str,
        body: Option<&str>,
        ticket: Option<ResolvedTicket>,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(ticket) = ticket else {
            info!("No ticket key in title or branch, nothing to synchronize");
            return Ok(SyncOutcome::Skipped {
                reason: NO_KEY_REASON.to_string(),
            });
        };

        match self.tracker.as_deref() {
            Some(tracker) => self.apply_transition(tracker, &ticket).await?,
            None => debug!("Tracker credentials not configured, skipping transition"),
        }

        if self.config.sync.only_transition {
            return Ok(SyncOutcome::Completed);
        }

        if let Some(tracker) = self.tracker.as_deref() {
            if self.config.sync.assign_to_reporter {
                let reporter_id = tracker.get_issue_reporter_id(&ticket.key).await?;
                tracker.assign_issue(&ticket.key, &reporter_id).await?;
                info!(key = %ticket.key, "Issue assigned to reporter");
            }

            tracker
                .post_comment(&ticket.key, &linked_pr_document(title, &event.html_url))
                .await?;
            debug!(key = %ticket.key, "Linked pull request comment posted");
        }

        let update = self.build_update(title, body, &ticket);
        self.repo_host
            .update_pull_request(event.number, &update)
            .await?;
        info!(key = %ticket.key, "Pull request updated");

        Ok(SyncOutcome::Completed)
    }

    /// Compute and apply the effective workflow transition, if any.
    async fn apply_transition(
        &self,
        tracker: &dyn Tracker,
        ticket: &ResolvedTicket,
    ) -> Result<(), SyncError> {
        let other = self.config.sync.other_assignee_transition_name.as_deref();
        // The creator check is only needed when an override is configured.
        let created_by_me = match other {
            Some(_) => tracker.was_created_by_me(&ticket.key).await?,
            None => true,
        };

        let Some(name) = choose_transition(
            self.config.sync.transition_name.as_deref(),
            other,
            created_by_me,
        ) else {
            debug!(key = %ticket.key, "No transition configured, skipping");
            return Ok(());
        };

        tracker.transition_issue(&ticket.key, &name).await?;
        info!(key = %ticket.key, transition = %name, "Issue transitioned");
        Ok(())
    }

    /// Attach the configured fix version to the ticket (webhook merge path).
    async fn attach_fix_version(&self, ticket: &ResolvedTicket) -> Result<(), SyncError> {
        let Some(tracker) = self.tracker.as_deref() else {
            debug!("Tracker credentials not configured, skipping fix version");
            return Ok(());
        };
        let Some(prefix) = self
            .config
            .project
            .fix_version
            .as_deref()
            .filter(|p| !p.is_empty())
        else {
            debug!("No fix version configured, skipping");
            return Ok(());
        };

        let version_id = tracker.get_version_id_by_prefix(prefix).await?;
        tracker.set_fix_version(&ticket.key, &version_id).await?;
        info!(key = %ticket.key, version = %version_id, "Fix version attached");
        Ok(())
    }

    /// Compose the pull request update: body always rewritten with the link
    /// prepended, title rewritten unless the key was already in the title.
    fn build_update(
        &self,
        title: &str,
        body: Option<&str>,
        ticket: &ResolvedTicket,
    ) -> PullRequestUpdate {
        let link = format_link(
            &self.config.tracker.host,
            &ticket.key,
            ticket.summary.as_deref(),
        );
        PullRequestUpdate {
            title: compose_title(title, &ticket.key, ticket.key_in_title()),
            body: Some(insert_link(body, &link, None)),
        }
    }

    /// Compile the configured append anchor, if any.
    fn compiled_append_pattern(&self) -> Result<Option<Regex>, SyncError> {
        match self.config.sync.append_after_pattern.as_deref() {
            Some(pattern) => Regex::new(pattern).map(Some).map_err(|e| {
                SyncError::InvalidConfig(format!(
                    "sync.append_after_pattern is not a valid regex: {e}"
                ))
            }),
            None => Ok(None),
        }
    }
}
