use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::jwt::AuthError;

/// Failure surface of the service layer. Each variant maps to exactly one
/// user-facing rendering; internal detail on 500-class variants is logged
/// server-side and never reaches the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("not the owner of this snippet")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(String),
    #[error("username already taken")]
    Conflict,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid or expired token".to_string(),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "not allowed to modify this snippet".to_string(),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            AppError::Conflict => (StatusCode::CONFLICT, "username already taken".to_string()),
            AppError::Hashing(msg) | AppError::Signing(msg) => {
                error!(error = %msg, "crypto failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
