//! Linked pull request comment documents.

use serde_json::json;

use super::CommentDoc;

/// Build the "linked pull request" comment document.
///
/// A single paragraph: a lead-in text node followed by the pull request
/// title carrying a link mark to its URL.
pub fn linked_pr_document(pr_title: &str, pr_url: &str) -> CommentDoc {
    let text = if pr_title.is_empty() { pr_url } else { pr_title };
    json!({
        "version": 1,
        "type": "doc",
        "content": [
            {
                "type": "paragraph",
                "content": [
                    {
                        "type": "text",
                        "text": "Linked pull request: "
                    },
                    {
                        "type": "text",
                        "text": text,
                        "marks": [
                            {
                                "type": "link",
                                "attrs": { "href": pr_url }
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_pr_document_shape() {
        let doc = linked_pr_document("Fix login bug", "https://github.com/acme/app/pull/42");

        assert_eq!(doc["version"], 1);
        assert_eq!(doc["type"], "doc");
        let paragraph = &doc["content"][0];
        assert_eq!(paragraph["type"], "paragraph");
        assert_eq!(paragraph["content"][0]["text"], "Linked pull request: ");
        let link_node = &paragraph["content"][1];
        assert_eq!(link_node["text"], "Fix login bug");
        assert_eq!(
            link_node["marks"][0]["attrs"]["href"],
            "https://github.com/acme/app/pull/42"
        );
    }

    #[test]
    fn test_linked_pr_document_falls_back_to_url_text() {
        let doc = linked_pr_document("", "https://example.com/pr/7");
        assert_eq!(
            doc["content"][0]["content"][1]["text"],
            "https://example.com/pr/7"
        );
    }
}
