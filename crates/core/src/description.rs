//! Pull request description surgery.
//!
//! Computes an insertion point in the existing body and produces a new body
//! with a tracker link inserted. The original text on both sides of the
//! insertion point is preserved byte for byte.

use regex_lite::Regex;

use crate::resolver::TicketKey;

/// Render the markdown link for a ticket.
///
/// `[KEY: SUMMARY](HOST/browse/KEY)` when a summary is available, else
/// `[KEY](HOST/browse/KEY)`.
pub fn format_link(host: &str, key: &TicketKey, summary: Option<&str>) -> String {
    let host = host.trim_end_matches('/');
    match summary {
        Some(summary) => format!("[{key}: {summary}]({host}/browse/{key})"),
        None => format!("[{key}]({host}/browse/{key})"),
    }
}

/// Insert `link` into `body`.
///
/// Without an anchor pattern (or when the pattern does not match) the link
/// goes at the very top followed by a newline. When the pattern matches, the
/// link is appended inline after the end of the first match, separated by a
/// single space.
pub fn insert_link(body: Option<&str>, link: &str, after_pattern: Option<&Regex>) -> String {
    let body = body.unwrap_or("");
    if let Some(pattern) = after_pattern {
        if let Some(m) = pattern.find(body) {
            let end = m.end();
            return format!("{} {}{}", &body[..end], link, &body[end..]);
        }
    }
    format!("{link}\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> TicketKey {
        TicketKey::new("AB-42")
    }

    #[test]
    fn test_format_link_with_summary() {
        let link = format_link("https://tracker.example.com", &key(), Some("Login broken"));
        assert_eq!(
            link,
            "[AB-42: Login broken](https://tracker.example.com/browse/AB-42)"
        );
    }

    #[test]
    fn test_format_link_without_summary() {
        let link = format_link("https://tracker.example.com", &key(), None);
        assert_eq!(link, "[AB-42](https://tracker.example.com/browse/AB-42)");
    }

    #[test]
    fn test_format_link_trims_trailing_slash() {
        let link = format_link("https://tracker.example.com/", &key(), None);
        assert_eq!(link, "[AB-42](https://tracker.example.com/browse/AB-42)");
    }

    #[test]
    fn test_insert_without_pattern_prepends() {
        let out = insert_link(Some("existing body"), "LINK", None);
        assert_eq!(out, "LINK\nexisting body");
    }

    #[test]
    fn test_insert_into_empty_body() {
        assert_eq!(insert_link(None, "LINK", None), "LINK\n");
        assert_eq!(insert_link(Some(""), "LINK", None), "LINK\n");
    }

    #[test]
    fn test_insert_after_anchor() {
        let pattern = Regex::new("## Related").unwrap();
        let body = "Intro\n## Related\nrest";
        let out = insert_link(Some(body), "LINK", Some(&pattern));
        assert_eq!(out, "Intro\n## Related LINK\nrest");
    }

    #[test]
    fn test_insert_after_anchor_preserves_both_sides() {
        let pattern = Regex::new("anchor").unwrap();
        let body = "before anchor after";
        let out = insert_link(Some(body), "LINK", Some(&pattern));
        let end = body.find("anchor").unwrap() + "anchor".len();
        assert_eq!(&out[..end], &body[..end]);
        assert!(out[end..].starts_with(" LINK"));
        assert_eq!(&out[end + " LINK".len()..], &body[end..]);
    }

    #[test]
    fn test_insert_anchor_first_match_wins() {
        let pattern = Regex::new("x+").unwrap();
        let out = insert_link(Some("axa xx"), "L", Some(&pattern));
        assert_eq!(out, "ax La xx");
    }

    #[test]
    fn test_insert_pattern_without_match_prepends() {
        let pattern = Regex::new("## Related").unwrap();
        let out = insert_link(Some("plain body"), "LINK", Some(&pattern));
        assert_eq!(out, "LINK\nplain body");
    }
}
