use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::Snippet;

/// Body for create and update; every field is required and must be
/// non-blank.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetInput {
    pub title: String,
    pub content: String,
    pub description: String,
    pub language: String,
}

/// Full snippet as shown to a viewer. `is_owner` is presentation-only:
/// true when the requester is the snippet's owner, false for everyone
/// else including anonymous viewers.
#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_owner: bool,
}

impl SnippetResponse {
    pub fn from_snippet(s: Snippet, is_owner: bool) -> Self {
        Self {
            id: s.id,
            title: s.title,
            content: s.content,
            description: s.description,
            language: s.language,
            created_at: s.created_at,
            updated_at: s.updated_at,
            is_owner,
        }
    }
}

/// Listing row; content stays behind the detail view.
#[derive(Debug, Serialize)]
pub struct SnippetListItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub created_at: OffsetDateTime,
}

impl From<Snippet> for SnippetListItem {
    fn from(s: Snippet) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            language: s.language,
            created_at: s.created_at,
        }
    }
}

/// One group of the language-bucketed listing.
#[derive(Debug, Serialize)]
pub struct LanguageSnippets {
    pub language: String,
    pub snippets: Vec<SnippetListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_owner_flag() {
        let snippet = Snippet {
            id: "alice-1".into(),
            user_id: 1,
            seq: 1,
            title: "t".into(),
            content: "c".into(),
            description: "d".into(),
            language: "Go".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json =
            serde_json::to_string(&SnippetResponse::from_snippet(snippet, true)).unwrap();
        assert!(json.contains("\"is_owner\":true"));
        assert!(json.contains("alice-1"));
    }
}
