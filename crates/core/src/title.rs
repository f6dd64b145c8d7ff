//! Pull request title composition.

use crate::resolver::TicketKey;

/// Decide the new pull request title.
///
/// Returns `None` when the key is already present in the title (nothing to
/// change), otherwise the title with a bracketed key suffix.
pub fn compose_title(title: &str, key: &TicketKey, key_in_title: bool) -> Option<String> {
    if key_in_title {
        None
    } else {
        Some(format!("{title} [{key}]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_unchanged_when_key_present() {
        let key = TicketKey::new("AB-42");
        assert_eq!(compose_title("Fix login bug AB-42", &key, true), None);
    }

    #[test]
    fn test_title_gets_bracketed_suffix() {
        let key = TicketKey::new("AB-99");
        assert_eq!(
            compose_title("Fix login bug", &key, false),
            Some("Fix login bug [AB-99]".to_string())
        );
    }
}
