use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::SnippetInput;
use crate::error::AppError;

/// Snippet record in the database. `id` is the public identifier
/// `<username>-<seq>`; `seq` is the per-owner sequence number behind it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Snippet {
    pub id: String,
    pub user_id: i64,
    pub seq: i64,
    pub title: String,
    pub content: String,
    pub description: String,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Public identifier for the `seq`-th snippet of `username`.
pub fn snippet_id(username: &str, seq: i64) -> String {
    format!("{username}-{seq}")
}

/// Insert a snippet, allocating its identifier inside the same transaction.
/// The counter lives on the owner's row and is bumped with a single UPDATE;
/// the row lock serialises concurrent creations by the same owner, and the
/// unique (user_id, seq) constraint backstops the invariant. Counts are
/// keyed strictly by owner id, never by matching on the identifier string,
/// which would collide for usernames that prefix one another.
pub async fn create(db: &PgPool, owner_id: i64, input: &SnippetInput) -> Result<Snippet, AppError> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, (String, i64)>(
        r#"
        UPDATE users
        SET snippet_seq = snippet_seq + 1
        WHERE id = $1
        RETURNING username, snippet_seq
        "#,
    )
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (username, seq) = row.ok_or_else(|| AppError::NotFound("user".into()))?;
    let id = snippet_id(&username, seq);

    let snippet = sqlx::query_as::<_, Snippet>(
        r#"
        INSERT INTO snippets (id, user_id, seq, title, content, description, language)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, seq, title, content, description, language, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(seq)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.description)
    .bind(&input.language)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(snippet)
}

pub async fn find_by_id(db: &PgPool, id: &str) -> Result<Option<Snippet>, AppError> {
    let snippet = sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, user_id, seq, title, content, description, language, created_at, updated_at
        FROM snippets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(snippet)
}

pub async fn list_by_language(db: &PgPool, language: &str) -> Result<Vec<Snippet>, AppError> {
    let rows = sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, user_id, seq, title, content, description, language, created_at, updated_at
        FROM snippets
        WHERE language = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(language)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_owner(db: &PgPool, owner_id: i64) -> Result<Vec<Snippet>, AppError> {
    let rows = sqlx::query_as::<_, Snippet>(
        r#"
        SELECT id, user_id, seq, title, content, description, language, created_at, updated_at
        FROM snippets
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn update(db: &PgPool, id: &str, input: &SnippetInput) -> Result<Snippet, AppError> {
    let snippet = sqlx::query_as::<_, Snippet>(
        r#"
        UPDATE snippets
        SET title = $2, content = $3, description = $4, language = $5, updated_at = now()
        WHERE id = $1
        RETURNING id, user_id, seq, title, content, description, language, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.description)
    .bind(&input.language)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("snippet {id}")))?;
    Ok(snippet)
}

pub async fn delete(db: &PgPool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query(r#"DELETE FROM snippets WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("snippet {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_username_dash_sequence() {
        assert_eq!(snippet_id("alice", 1), "alice-1");
        assert_eq!(snippet_id("alice", 42), "alice-42");
        assert_eq!(snippet_id("Alice_99", 7), "Alice_99-7");
    }
}
