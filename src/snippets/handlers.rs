use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{LanguageSnippets, SnippetInput, SnippetListItem, SnippetResponse};
use super::service;
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/snippets", get(list_snippets))
        .route("/snippets/my", get(my_snippets))
        .route("/snippets/new", post(create_snippet))
        .route("/snippets/user/:username", get(user_snippets))
        .route("/snippets/:id", get(view_snippet))
        .route("/snippets/:id/edit", put(update_snippet))
        .route("/snippets/:id/delete", delete(delete_snippet))
}

#[instrument(skip(state))]
pub async fn list_snippets(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageSnippets>>, AppError> {
    let groups = service::list_grouped(&state.db).await?;
    Ok(Json(groups))
}

#[instrument(skip(state))]
pub async fn user_snippets(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<SnippetListItem>>, AppError> {
    let snippets = service::list_by_username(&state.db, &username).await?;
    Ok(Json(snippets.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn my_snippets(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<SnippetListItem>>, AppError> {
    let snippets = service::list_by_owner(&state.db, claims.sub).await?;
    Ok(Json(snippets.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, input))]
pub async fn create_snippet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(input): Json<SnippetInput>,
) -> Result<(StatusCode, HeaderMap, Json<SnippetResponse>), AppError> {
    let snippet = service::create(&state.db, claims.sub, input).await?;
    info!(user_id = claims.sub, snippet_id = %snippet.id, "snippet created");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        format!("/snippets/{}", snippet.id).parse().unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(SnippetResponse::from_snippet(snippet, true)),
    ))
}

#[instrument(skip(state, user))]
pub async fn view_snippet(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SnippetResponse>, AppError> {
    let requester_id = user.map(|AuthUser(claims)| claims.sub);
    let (snippet, owned) = service::get(&state.db, &id, requester_id).await?;
    Ok(Json(SnippetResponse::from_snippet(snippet, owned)))
}

#[instrument(skip(state, input))]
pub async fn update_snippet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<SnippetInput>,
) -> Result<Json<SnippetResponse>, AppError> {
    let snippet = service::update(&state.db, &id, claims.sub, input).await?;
    info!(user_id = claims.sub, snippet_id = %snippet.id, "snippet updated");
    Ok(Json(SnippetResponse::from_snippet(snippet, true)))
}

#[instrument(skip(state))]
pub async fn delete_snippet(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service::delete(&state.db, &id, claims.sub).await?;
    info!(user_id = claims.sub, snippet_id = %id, "snippet deleted");
    Ok(StatusCode::NO_CONTENT)
}
