//! Core reconciliation engine for prsync.
//!
//! Resolves a ticket key from a pull request event and performs the
//! configured synchronization actions against the issue tracker and the
//! repository host: issue creation, workflow transition, assignment,
//! commenting, and pull request title/description rewriting.

pub mod config;
pub mod description;
pub mod event;
pub mod repo_host;
pub mod resolver;
pub mod sync;
pub mod testing;
pub mod title;
pub mod tracker;
pub mod transition;
pub mod webhook;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    ProjectConfig, RepoHostConfig, SyncOptions, TrackerConfig, TrackerCredentials, WebhookConfig,
};
pub use description::{format_link, insert_link};
pub use event::{EventError, PullRequestEvent, PullRequestUpdate};
pub use repo_host::{
    GithubRepoHost, PullRequestSnapshot, RepoHost, RepoHostError, UserProfile,
};
pub use resolver::{resolve_key, KeySource, TicketKey};
pub use sync::{Reconciler, ResolvedTicket, SyncError, SyncOutcome};
pub use title::compose_title;
pub use tracker::{
    CommentDoc, CreateIssueRequest, CreatedIssue, JiraTracker, Sprint, Tracker, TrackerError,
};
pub use transition::choose_transition;
pub use webhook::{HttpNotifier, Notifier, NotifyError, WebhookPayload};
