//! Ticket key resolution from free-form text.
//!
//! A ticket key has the shape `PROJECT-NUMBER` (uppercase letters, a dash,
//! digits). The pattern requires a non-letter character immediately before
//! the key so it never matches inside a longer alphanumeric run.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

const KEY_PATTERN: &str = "[^a-zA-Z]([A-Z]+-[0-9]+)";

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(KEY_PATTERN).expect("key pattern is valid"))
}

/// A tracker issue key, e.g. `AB-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketKey(String);

impl TicketKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the active ticket key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Matched in the pull request title.
    Title,
    /// Matched in the head branch name.
    Branch,
    /// Adopted from an issue created during this run. Never produced by
    /// [`resolve_key`].
    Created,
}

/// Resolve a ticket key from the pull request title, falling back to the
/// head branch name.
///
/// Returns `None` when neither matches; callers treat that as "no ticket
/// associated", not an error. When the text contains several key-like
/// substrings the leftmost match wins.
pub fn resolve_key(title: &str, branch: &str) -> Option<(TicketKey, KeySource)> {
    if let Some(key) = first_key(title) {
        return Some((key, KeySource::Title));
    }
    first_key(branch).map(|key| (key, KeySource::Branch))
}

fn first_key(text: &str) -> Option<TicketKey> {
    key_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| TicketKey::new(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_title() {
        let (key, source) = resolve_key("Fix login bug AB-42", "feature/other").unwrap();
        assert_eq!(key.as_str(), "AB-42");
        assert_eq!(source, KeySource::Title);
    }

    #[test]
    fn test_title_match_ignores_branch() {
        let (key, source) = resolve_key("Fix AB-42", "feature/CD-7-thing").unwrap();
        assert_eq!(key.as_str(), "AB-42");
        assert_eq!(source, KeySource::Title);
    }

    #[test]
    fn test_resolve_falls_back_to_branch() {
        let (key, source) = resolve_key("Fix login bug", "feature/AB-99-fix").unwrap();
        assert_eq!(key.as_str(), "AB-99");
        assert_eq!(source, KeySource::Branch);
    }

    #[test]
    fn test_no_match_anywhere() {
        assert!(resolve_key("Fix login bug", "feature/login").is_none());
    }

    #[test]
    fn test_lowercase_key_does_not_match() {
        assert!(resolve_key("Fix login bug", "feature/ab-99-fix").is_none());
    }

    #[test]
    fn test_first_of_multiple_keys_wins() {
        let (key, _) = resolve_key("Covers AB-1 and CD-2", "main").unwrap();
        assert_eq!(key.as_str(), "AB-1");
    }

    #[test]
    fn test_key_requires_preceding_non_letter() {
        // Inside an alphanumeric run the token is not a key.
        assert!(resolve_key("prefixAB-42", "main").is_none());
        // At the very start of the text there is no preceding character.
        assert!(resolve_key("AB-42 fix things", "main").is_none());
        // A slash or space before the token is enough.
        assert!(resolve_key("fix (AB-42)", "main").is_some());
    }

    #[test]
    fn test_key_with_digits_in_project_does_not_match_project_part() {
        // Only letters are allowed in the project part.
        let (key, _) = resolve_key("see A1B-42 here", "main").unwrap();
        // The pattern anchors on the non-letter '1', so it captures `B-42`.
        assert_eq!(key.as_str(), "B-42");
    }

    #[test]
    fn test_ticket_key_display() {
        let key = TicketKey::new("AB-42");
        assert_eq!(key.to_string(), "AB-42");
        assert_eq!(format!("{key}"), "AB-42");
    }

    #[test]
    fn test_ticket_key_serde_transparent() {
        let key = TicketKey::new("AB-42");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"AB-42\"");
        let parsed: TicketKey = serde_json::from_str("\"CD-7\"").unwrap();
        assert_eq!(parsed.as_str(), "CD-7");
    }
}
