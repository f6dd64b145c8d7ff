//! Workflow transition selection.

/// Choose the effective transition name for a ticket.
///
/// When `other_assignee` is configured and the ticket was not created by the
/// automation's own tracker identity, it overrides `configured`. Otherwise
/// `configured` is used as-is; `None` means "skip the transition".
pub fn choose_transition(
    configured: Option<&str>,
    other_assignee: Option<&str>,
    created_by_me: bool,
) -> Option<String> {
    match other_assignee {
        Some(name) if !created_by_me => Some(name.to_string()),
        _ => configured.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_transition_used_by_default() {
        assert_eq!(
            choose_transition(Some("In Review"), None, true),
            Some("In Review".to_string())
        );
        assert_eq!(
            choose_transition(Some("In Review"), None, false),
            Some("In Review".to_string())
        );
    }

    #[test]
    fn test_other_assignee_overrides_for_foreign_tickets() {
        assert_eq!(
            choose_transition(Some("In Review"), Some("Needs Triage"), false),
            Some("Needs Triage".to_string())
        );
        assert_eq!(
            choose_transition(None, Some("Needs Triage"), false),
            Some("Needs Triage".to_string())
        );
    }

    #[test]
    fn test_other_assignee_ignored_for_own_tickets() {
        assert_eq!(
            choose_transition(Some("In Review"), Some("Needs Triage"), true),
            Some("In Review".to_string())
        );
    }

    #[test]
    fn test_nothing_configured_skips() {
        assert_eq!(choose_transition(None, None, true), None);
        assert_eq!(choose_transition(None, None, false), None);
    }
}
