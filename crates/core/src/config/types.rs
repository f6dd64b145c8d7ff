use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub repo_host: RepoHostConfig,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub sync: SyncOptions,
    /// Path of the JSON event payload written by the CI runner.
    #[serde(default = "default_event_path")]
    pub event_path: PathBuf,
}

fn default_event_path() -> PathBuf {
    PathBuf::from("event.json")
}

/// Issue tracker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Tracker base URL (e.g., "https://acme.atlassian.net")
    pub host: String,
    /// API credentials; their presence gates every tracker call
    #[serde(default)]
    pub credentials: Option<TrackerCredentials>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Tracker API credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerCredentials {
    pub email: String,
    pub token: String,
}

/// Repository host configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoHostConfig {
    /// API base URL (default: "https://api.github.com")
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Repository slug, "owner/repo"
    pub repository: String,
    /// API token
    pub token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Outbound webhook configuration; presence selects webhook-relay mode
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    pub url: String,
}

/// Tracker project identifiers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project key, required for issue creation
    #[serde(default)]
    pub key: Option<String>,
    /// Version name prefix used to resolve the fix version on merge
    #[serde(default)]
    pub fix_version: Option<String>,
    /// Component attached to created issues
    #[serde(default)]
    pub component: Option<String>,
    /// Issue type name, required for issue creation
    #[serde(default)]
    pub issue_type: Option<String>,
    /// Agile board id for the active-sprint move after creation
    #[serde(default)]
    pub board_id: Option<u64>,
}

/// Synchronization toggles
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SyncOptions {
    /// Stop after the workflow transition
    #[serde(default)]
    pub only_transition: bool,
    /// Create a tracker issue when no key resolves
    #[serde(default)]
    pub create_issue: bool,
    /// Only rewrite the pull request description
    #[serde(default)]
    pub only_append_description: bool,
    /// Assign the ticket to its reporter
    #[serde(default)]
    pub assign_to_reporter: bool,
    /// Attach the fix version when the pull request merges (webhook mode)
    #[serde(default)]
    pub add_fix_version_on_merge: bool,
    /// Regex anchor after which the link is appended inline
    #[serde(default)]
    pub append_after_pattern: Option<String>,
    /// Workflow transition to apply
    #[serde(default)]
    pub transition_name: Option<String>,
    /// Transition applied instead when the ticket was created by someone else
    #[serde(default)]
    pub other_assignee_transition_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[tracker]
host = "https://acme.atlassian.net"

[repo_host]
repository = "acme/app"
token = "gh-token"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tracker.host, "https://acme.atlassian.net");
        assert!(config.tracker.credentials.is_none());
        assert_eq!(config.tracker.timeout_secs, 30);
        assert_eq!(config.repo_host.api_base, "https://api.github.com");
        assert!(config.webhook.is_none());
        assert!(!config.sync.create_issue);
        assert_eq!(config.event_path, PathBuf::from("event.json"));
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r###"
event_path = "/workflow/event.json"

[tracker]
host = "https://acme.atlassian.net"
timeout_secs = 10

[tracker.credentials]
email = "bot@acme.com"
token = "secret"

[repo_host]
repository = "acme/app"
token = "gh-token"
api_base = "https://github.internal/api/v3"

[webhook]
url = "https://hooks.acme.com/pr"

[project]
key = "AB"
fix_version = "1.4"
component = "backend"
issue_type = "Task"
board_id = 17

[sync]
create_issue = true
assign_to_reporter = true
append_after_pattern = "## Related"
transition_name = "In Review"
"###;
        let config: Config = toml::from_str(toml).unwrap();
        let credentials = config.tracker.credentials.unwrap();
        assert_eq!(credentials.email, "bot@acme.com");
        assert_eq!(config.tracker.timeout_secs, 10);
        assert_eq!(config.webhook.unwrap().url, "https://hooks.acme.com/pr");
        assert_eq!(config.project.key.as_deref(), Some("AB"));
        assert_eq!(config.project.board_id, Some(17));
        assert!(config.sync.create_issue);
        assert!(config.sync.assign_to_reporter);
        assert_eq!(
            config.sync.append_after_pattern.as_deref(),
            Some("## Related")
        );
        assert_eq!(config.event_path, PathBuf::from("/workflow/event.json"));
    }

    #[test]
    fn test_deserialize_missing_tracker_fails() {
        let toml = r#"
[repo_host]
repository = "acme/app"
token = "gh-token"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
