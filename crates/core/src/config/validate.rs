use regex_lite::Regex;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tracker host is present
/// - Repository slug has the "owner/repo" shape
/// - Issue creation has the inputs it needs
/// - The append anchor compiles as a regex
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.tracker.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tracker.host cannot be empty".to_string(),
        ));
    }

    let repository = &config.repo_host.repository;
    if !repository.contains('/') || repository.starts_with('/') || repository.ends_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "repo_host.repository must be \"owner/repo\", got \"{repository}\""
        )));
    }

    if config.sync.create_issue {
        if config.project.key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::ValidationError(
                "sync.create_issue requires project.key".to_string(),
            ));
        }
        if config.project.issue_type.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::ValidationError(
                "sync.create_issue requires project.issue_type".to_string(),
            ));
        }
        if config.tracker.credentials.is_none() {
            return Err(ConfigError::ValidationError(
                "sync.create_issue requires tracker credentials".to_string(),
            ));
        }
    }

    if let Some(pattern) = config.sync.append_after_pattern.as_deref() {
        Regex::new(pattern).map_err(|e| {
            ConfigError::ValidationError(format!(
                "sync.append_after_pattern is not a valid regex: {e}"
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[tracker]
host = "https://acme.atlassian.net"

[tracker.credentials]
email = "bot@acme.com"
token = "secret"

[repo_host]
repository = "acme/app"
token = "gh-token"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_host_fails() {
        let mut config = valid_config();
        config.tracker.host = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_bad_repository_slug_fails() {
        let mut config = valid_config();
        config.repo_host.repository = "just-a-name".to_string();
        assert!(validate_config(&config).is_err());

        config.repo_host.repository = "acme/".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_create_issue_requires_project_inputs() {
        let mut config = valid_config();
        config.sync.create_issue = true;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("project.key"));

        config.project.key = Some("AB".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("project.issue_type"));

        config.project.issue_type = Some("Task".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_create_issue_requires_credentials() {
        let mut config = valid_config();
        config.sync.create_issue = true;
        config.project.key = Some("AB".to_string());
        config.project.issue_type = Some("Task".to_string());
        config.tracker.credentials = None;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_validate_bad_append_pattern_fails() {
        let mut config = valid_config();
        config.sync.append_after_pattern = Some("([unclosed".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("append_after_pattern"));
    }
}
