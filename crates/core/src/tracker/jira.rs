//! Jira issue tracker implementation.
//!
//! Talks to the REST v3 API for issues, comments, transitions, users and
//! versions, and to the Agile 1.0 API for boards and sprints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::{TrackerConfig, TrackerCredentials};
use crate::resolver::TicketKey;

use super::{CommentDoc, CreateIssueRequest, CreatedIssue, Sprint, Tracker, TrackerError};

/// Jira issue tracker implementation.
pub struct JiraTracker {
    client: Client,
    host: String,
    credentials: TrackerCredentials,
    /// Project key for version lookups; versions are scoped per project.
    project_key: Option<String>,
}

impl JiraTracker {
    /// Create a new JiraTracker with the given configuration.
    pub fn new(
        config: &TrackerConfig,
        credentials: TrackerCredentials,
        project_key: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            credentials,
            project_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3{}", self.host, path)
    }

    fn agile_url(&self, path: &str) -> String {
        format!("{}/rest/agile/1.0{}", self.host, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let response = request
            .basic_auth(&self.credentials.email, Some(&self.credentials.token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TrackerError::Timeout
                } else if e.is_connect() {
                    TrackerError::ConnectionFailed(e.to_string())
                } else {
                    TrackerError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TrackerError::AuthenticationFailed(format!("HTTP {status}")));
        }
        Ok(response)
    }

    async fn check_success(response: Response) -> Result<Response, TrackerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, TrackerError> {
        response
            .json()
            .await
            .map_err(|e| TrackerError::ApiError(format!("Failed to parse response: {e}")))
    }

    async fn get_issue_fields(
        &self,
        key: &TicketKey,
        fields: &str,
    ) -> Result<JiraIssueFields, TrackerError> {
        let url = self.api_url(&format!("/issue/{key}?fields={fields}"));
        let response = self.send(self.client.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::IssueNotFound(key.to_string()));
        }
        let issue: JiraIssue = Self::parse(Self::check_success(response).await?).await?;
        Ok(issue.fields)
    }
}

#[async_trait]
impl Tracker for JiraTracker {
    fn name(&self) -> &str {
        "jira"
    }

    async fn get_issue_summary(&self, key: &TicketKey) -> Result<String, TrackerError> {
        let fields = self.get_issue_fields(key, "summary").await?;
        fields
            .summary
            .ok_or_else(|| TrackerError::ApiError(format!("Issue {key} returned no summary")))
    }

    async fn get_version_id_by_prefix(&self, prefix: &str) -> Result<String, TrackerError> {
        let project_key = self.project_key.as_deref().ok_or_else(|| {
            TrackerError::ApiError("Version lookup requires a configured project key".to_string())
        })?;
        let url = self.api_url(&format!("/project/{project_key}/versions"));
        debug!(project = project_key, prefix = prefix, "Resolving version");

        let response = Self::check_success(self.send(self.client.get(&url)).await?).await?;
        let versions: Vec<JiraVersion> = Self::parse(response).await?;
        find_version_id(&versions, prefix)
            .ok_or_else(|| TrackerError::VersionNotFound(prefix.to_string()))
    }

    async fn set_fix_version(
        &self,
        key: &TicketKey,
        version_id: &str,
    ) -> Result<(), TrackerError> {
        let url = self.api_url(&format!("/issue/{key}"));
        let body = json!({
            "update": {
                "fixVersions": [ { "add": { "id": version_id } } ]
            }
        });
        let response = self.send(self.client.put(&url).json(&body)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::IssueNotFound(key.to_string()));
        }
        Self::check_success(response).await?;
        Ok(())
    }

    async fn post_comment(&self, key: &TicketKey, doc: &CommentDoc) -> Result<(), TrackerError> {
        let url = self.api_url(&format!("/issue/{key}/comment"));
        let body = json!({ "body": doc });
        let response = self.send(self.client.post(&url).json(&body)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::IssueNotFound(key.to_string()));
        }
        Self::check_success(response).await?;
        Ok(())
    }

    async fn create_issue(
        &self,
        request: CreateIssueRequest,
    ) -> Result<CreatedIssue, TrackerError> {
        let url = self.api_url("/issue");
        let body = json!({ "fields": build_create_fields(&request) });
        debug!(
            project = %request.project_key,
            issue_type = %request.issue_type,
            "Creating issue"
        );

        let response = Self::check_success(self.send(self.client.post(&url).json(&body)).await?)
            .await?;
        let created: JiraCreatedIssue = Self::parse(response).await?;
        Ok(CreatedIssue {
            key: TicketKey::new(created.key),
        })
    }

    async fn get_user_id_by_fuzzy_name(&self, name: &str) -> Result<String, TrackerError> {
        let url = self.api_url(&format!("/user/search?query={}", urlencoding::encode(name)));
        let response = Self::check_success(self.send(self.client.get(&url)).await?).await?;
        let users: Vec<JiraUser> = Self::parse(response).await?;
        users
            .into_iter()
            .next()
            .map(|u| u.account_id)
            .ok_or_else(|| TrackerError::UserNotFound(name.to_string()))
    }

    async fn was_created_by_me(&self, key: &TicketKey) -> Result<bool, TrackerError> {
        let url = self.api_url("/myself");
        let response = Self::check_success(self.send(self.client.get(&url)).await?).await?;
        let myself: JiraUser = Self::parse(response).await?;

        let fields = self.get_issue_fields(key, "creator").await?;
        Ok(fields
            .creator
            .map(|c| c.account_id == myself.account_id)
            .unwrap_or(false))
    }

    async fn transition_issue(
        &self,
        key: &TicketKey,
        transition_name: &str,
    ) -> Result<(), TrackerError> {
        let url = self.api_url(&format!("/issue/{key}/transitions"));
        let response = self.send(self.client.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::IssueNotFound(key.to_string()));
        }
        let available: JiraTransitionsResponse =
            Self::parse(Self::check_success(response).await?).await?;

        let transition_id = find_transition_id(&available.transitions, transition_name)
            .ok_or_else(|| TrackerError::TransitionNotFound {
                issue: key.to_string(),
                name: transition_name.to_string(),
            })?;

        let body = json!({ "transition": { "id": transition_id } });
        Self::check_success(self.send(self.client.post(&url).json(&body)).await?).await?;
        debug!(key = %key, transition = transition_name, "Transition applied");
        Ok(())
    }

    async fn assign_issue(&self, key: &TicketKey, account_id: &str) -> Result<(), TrackerError> {
        let url = self.api_url(&format!("/issue/{key}/assignee"));
        let body = json!({ "accountId": account_id });
        let response = self.send(self.client.put(&url).json(&body)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::IssueNotFound(key.to_string()));
        }
        Self::check_success(response).await?;
        Ok(())
    }

    async fn get_issue_reporter_id(&self, key: &TicketKey) -> Result<String, TrackerError> {
        let fields = self.get_issue_fields(key, "reporter").await?;
        fields
            .reporter
            .map(|r| r.account_id)
            .ok_or_else(|| TrackerError::ApiError(format!("Issue {key} has no reporter")))
    }

    async fn get_active_sprint(&self, board_id: u64) -> Result<Sprint, TrackerError> {
        let url = self.agile_url(&format!("/board/{board_id}/sprint?state=active"));
        let response = Self::check_success(self.send(self.client.get(&url)).await?).await?;
        let sprints: JiraSprintsResponse = Self::parse(response).await?;
        sprints
            .values
            .into_iter()
            .next()
            .map(|s| Sprint {
                id: s.id,
                name: s.name,
            })
            .ok_or(TrackerError::NoActiveSprint(board_id))
    }

    async fn move_issues_to_sprint(
        &self,
        keys: &[TicketKey],
        sprint_id: u64,
    ) -> Result<(), TrackerError> {
        let url = self.agile_url(&format!("/sprint/{sprint_id}/issue"));
        let body = json!({ "issues": keys });
        Self::check_success(self.send(self.client.post(&url).json(&body)).await?).await?;
        Ok(())
    }
}

/// Build the `fields` object for an issue-create request.
fn build_create_fields(request: &CreateIssueRequest) -> Value {
    let mut fields = json!({
        "project": { "key": request.project_key },
        "issuetype": { "name": request.issue_type },
        "summary": request.summary,
    });
    if let Some(component) = &request.component {
        fields["components"] = json!([ { "name": component } ]);
    }
    if let Some(assignee_id) = &request.assignee_id {
        fields["assignee"] = json!({ "id": assignee_id });
    }
    fields
}

/// Find a transition id by case-insensitive name.
fn find_transition_id(transitions: &[JiraTransition], name: &str) -> Option<String> {
    transitions
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .map(|t| t.id.clone())
}

/// Find the first version whose name starts with the given prefix.
fn find_version_id(versions: &[JiraVersion], prefix: &str) -> Option<String> {
    versions
        .iter()
        .find(|v| v.name.starts_with(prefix))
        .map(|v| v.id.clone())
}

// Jira API response types
#[derive(Debug, Deserialize)]
struct JiraIssue {
    fields: JiraIssueFields,
}

#[derive(Debug, Deserialize)]
struct JiraIssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    creator: Option<JiraUser>,
    #[serde(default)]
    reporter: Option<JiraUser>,
}

#[derive(Debug, Deserialize)]
struct JiraUser {
    #[serde(rename = "accountId")]
    account_id: String,
}

#[derive(Debug, Deserialize)]
struct JiraVersion {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct JiraTransitionsResponse {
    transitions: Vec<JiraTransition>,
}

#[derive(Debug, Deserialize)]
struct JiraTransition {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct JiraCreatedIssue {
    key: String,
}

#[derive(Debug, Deserialize)]
struct JiraSprintsResponse {
    values: Vec<JiraSprint>,
}

#[derive(Debug, Deserialize)]
struct JiraSprint {
    id: u64,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> JiraTracker {
        let config = TrackerConfig {
            host: "https://acme.atlassian.net/".to_string(),
            credentials: None,
            timeout_secs: 30,
        };
        let credentials = TrackerCredentials {
            email: "bot@acme.com".to_string(),
            token: "secret".to_string(),
        };
        JiraTracker::new(&config, credentials, Some("AB".to_string()))
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let tracker = tracker();
        assert_eq!(
            tracker.api_url("/issue/AB-42"),
            "https://acme.atlassian.net/rest/api/3/issue/AB-42"
        );
        assert_eq!(
            tracker.agile_url("/board/17/sprint?state=active"),
            "https://acme.atlassian.net/rest/agile/1.0/board/17/sprint?state=active"
        );
    }

    #[test]
    fn test_build_create_fields_minimal() {
        let request = CreateIssueRequest::new("AB", "Task", "Fix login bug");
        let fields = build_create_fields(&request);
        assert_eq!(fields["project"]["key"], "AB");
        assert_eq!(fields["issuetype"]["name"], "Task");
        assert_eq!(fields["summary"], "Fix login bug");
        assert!(fields.get("components").is_none());
        assert!(fields.get("assignee").is_none());
    }

    #[test]
    fn test_build_create_fields_full() {
        let request = CreateIssueRequest::new("AB", "Task", "s")
            .with_component("backend")
            .with_assignee("acc-1");
        let fields = build_create_fields(&request);
        assert_eq!(fields["components"][0]["name"], "backend");
        assert_eq!(fields["assignee"]["id"], "acc-1");
    }

    #[test]
    fn test_find_transition_id_case_insensitive() {
        let transitions = vec![
            JiraTransition {
                id: "11".to_string(),
                name: "To Do".to_string(),
            },
            JiraTransition {
                id: "21".to_string(),
                name: "In Review".to_string(),
            },
        ];
        assert_eq!(
            find_transition_id(&transitions, "in review"),
            Some("21".to_string())
        );
        assert_eq!(find_transition_id(&transitions, "Done"), None);
    }

    #[test]
    fn test_find_version_id_by_prefix() {
        let versions = vec![
            JiraVersion {
                id: "100".to_string(),
                name: "1.3.0".to_string(),
            },
            JiraVersion {
                id: "101".to_string(),
                name: "1.4.0".to_string(),
            },
        ];
        assert_eq!(find_version_id(&versions, "1.4"), Some("101".to_string()));
        assert_eq!(find_version_id(&versions, "2."), None);
    }

    #[test]
    fn test_parse_transitions_response() {
        let raw = r#"{"transitions": [{"id": "31", "name": "Done", "to": {"name": "Done"}}]}"#;
        let parsed: JiraTransitionsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.transitions.len(), 1);
        assert_eq!(parsed.transitions[0].id, "31");
    }

    #[test]
    fn test_parse_sprints_response() {
        let raw = r#"{"maxResults": 50, "values": [{"id": 7, "name": "Sprint 7", "state": "active"}]}"#;
        let parsed: JiraSprintsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.values[0].id, 7);
        assert_eq!(parsed.values[0].name, "Sprint 7");
    }
}
