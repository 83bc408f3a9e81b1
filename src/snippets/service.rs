use sqlx::PgPool;

use super::dto::{LanguageSnippets, SnippetInput};
use super::repo::{self, Snippet};
use crate::auth::repo::User;
use crate::error::AppError;

/// Fixed language buckets of the public listing.
pub const LANGUAGE_GROUPS: [&str; 5] = ["Python", "JavaScript", "Go", "Rust", "TypeScript"];

/// Ownership policy for every mutating operation: only the snippet's owner
/// may proceed.
pub fn ensure_owner(snippet: &Snippet, requester_id: i64) -> Result<(), AppError> {
    if snippet.user_id != requester_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Presentation flag: whether the (possibly anonymous) requester owns the
/// snippet.
pub fn is_owner(snippet: &Snippet, requester_id: Option<i64>) -> bool {
    requester_id == Some(snippet.user_id)
}

fn validate(input: &SnippetInput) -> Result<(), AppError> {
    for (field, value) in [
        ("title", &input.title),
        ("content", &input.content),
        ("description", &input.description),
        ("language", &input.language),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}

pub async fn create(db: &PgPool, owner_id: i64, input: SnippetInput) -> Result<Snippet, AppError> {
    validate(&input)?;
    repo::create(db, owner_id, &input).await
}

pub async fn get(
    db: &PgPool,
    id: &str,
    requester_id: Option<i64>,
) -> Result<(Snippet, bool), AppError> {
    let snippet = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("snippet {id}")))?;
    let owned = is_owner(&snippet, requester_id);
    Ok((snippet, owned))
}

/// Snippets bucketed by the fixed language set, one query per bucket.
pub async fn list_grouped(db: &PgPool) -> Result<Vec<LanguageSnippets>, AppError> {
    let mut groups = Vec::with_capacity(LANGUAGE_GROUPS.len());
    for language in LANGUAGE_GROUPS {
        let snippets = repo::list_by_language(db, language).await?;
        groups.push(LanguageSnippets {
            language: language.to_string(),
            snippets: snippets.into_iter().map(Into::into).collect(),
        });
    }
    Ok(groups)
}

pub async fn list_by_username(db: &PgPool, username: &str) -> Result<Vec<Snippet>, AppError> {
    let user = User::find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
    repo::list_by_owner(db, user.id).await
}

pub async fn list_by_owner(db: &PgPool, owner_id: i64) -> Result<Vec<Snippet>, AppError> {
    repo::list_by_owner(db, owner_id).await
}

pub async fn update(
    db: &PgPool,
    id: &str,
    requester_id: i64,
    input: SnippetInput,
) -> Result<Snippet, AppError> {
    validate(&input)?;
    let existing = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("snippet {id}")))?;
    ensure_owner(&existing, requester_id)?;
    repo::update(db, id, &input).await
}

pub async fn delete(db: &PgPool, id: &str, requester_id: i64) -> Result<(), AppError> {
    let existing = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("snippet {id}")))?;
    ensure_owner(&existing, requester_id)?;
    repo::delete(db, id).await
}
