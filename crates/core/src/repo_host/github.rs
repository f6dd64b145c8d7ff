//! GitHub repository host implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::RepoHostConfig;
use crate::event::PullRequestUpdate;

use super::{PullRequestSnapshot, RepoHost, RepoHostError, UserProfile};

const USER_AGENT: &str = concat!("prsync/", env!("CARGO_PKG_VERSION"));

/// GitHub repository host implementation.
pub struct GithubRepoHost {
    client: Client,
    config: RepoHostConfig,
}

impl GithubRepoHost {
    /// Create a new GithubRepoHost with the given configuration.
    pub fn new(config: RepoHostConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build an API URL under the configured base.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn pull_request_url(&self, number: u64) -> String {
        self.api_url(&format!(
            "/repos/{}/pulls/{}",
            self.config.repository, number
        ))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RepoHostError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RepoHostError::Timeout
                } else if e.is_connect() {
                    RepoHostError::ConnectionFailed(e.to_string())
                } else {
                    RepoHostError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RepoHostError::AuthenticationFailed(format!(
                "HTTP {status}"
            )));
        }
        Ok(response)
    }

    async fn check_success(response: Response) -> Result<Response, RepoHostError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepoHostError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RepoHost for GithubRepoHost {
    fn name(&self) -> &str {
        "github"
    }

    async fn fetch_pull_request(
        &self,
        number: u64,
    ) -> Result<PullRequestSnapshot, RepoHostError> {
        let url = self.pull_request_url(number);
        debug!(number = number, "Fetching pull request");

        let response = self.send(self.client.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoHostError::PullRequestNotFound(number));
        }
        let response = Self::check_success(response).await?;

        let pr: GithubPullRequest = response
            .json()
            .await
            .map_err(|e| RepoHostError::ApiError(format!("Failed to parse response: {e}")))?;

        Ok(PullRequestSnapshot {
            title: pr.title,
            body: pr.body,
        })
    }

    async fn update_pull_request(
        &self,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<(), RepoHostError> {
        if update.is_empty() {
            debug!(number = number, "Empty update, nothing to send");
            return Ok(());
        }

        let url = self.pull_request_url(number);
        debug!(
            number = number,
            title = update.title.is_some(),
            body = update.body.is_some(),
            "Updating pull request"
        );

        let response = self.send(self.client.patch(&url).json(update)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoHostError::PullRequestNotFound(number));
        }
        Self::check_success(response).await?;
        Ok(())
    }

    async fn fetch_user(&self, login: &str) -> Result<UserProfile, RepoHostError> {
        let url = self.api_url(&format!("/users/{login}"));
        debug!(login = login, "Fetching user profile");

        let response = self.send(self.client.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoHostError::UserNotFound(login.to_string()));
        }
        let response = Self::check_success(response).await?;

        let user: GithubUser = response
            .json()
            .await
            .map_err(|e| RepoHostError::ApiError(format!("Failed to parse response: {e}")))?;

        Ok(UserProfile {
            login: user.login,
            display_name: user.name,
        })
    }
}

// GitHub API response types
#[derive(Debug, Deserialize)]
struct GithubPullRequest {
    title: String,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RepoHostConfig {
        RepoHostConfig {
            api_base: "https://api.github.com".to_string(),
            repository: "acme/app".to_string(),
            token: "gh-token".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_pull_request_url() {
        let host = GithubRepoHost::new(config());
        assert_eq!(
            host.pull_request_url(42),
            "https://api.github.com/repos/acme/app/pulls/42"
        );
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let mut cfg = config();
        cfg.api_base = "https://github.internal/api/v3/".to_string();
        let host = GithubRepoHost::new(cfg);
        assert_eq!(
            host.api_url("/users/octocat"),
            "https://github.internal/api/v3/users/octocat"
        );
    }

    #[test]
    fn test_parse_pull_request_response() {
        let raw = r#"{"number": 42, "title": "Fix bug", "body": null, "state": "open"}"#;
        let pr: GithubPullRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(pr.title, "Fix bug");
        assert!(pr.body.is_none());
    }

    #[test]
    fn test_parse_user_response() {
        let raw = r#"{"login": "octocat", "name": "The Octocat", "id": 1}"#;
        let user: GithubUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
    }
}
