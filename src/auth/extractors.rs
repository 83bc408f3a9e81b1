use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::auth::jwt::{AuthError, Claims, JwtKeys};
use crate::error::AppError;

/// Name of the session cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// Request gate: pulls the token from the `token` cookie (primary) or an
/// `Authorization: Bearer` header (fallback), verifies it and exposes the
/// claims. Routes on the public allow-list simply do not use the extractor;
/// use `Option<AuthUser>` where anonymous requests are admitted.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| bearer_token(parts));

        let token = token.ok_or(AppError::Auth(AuthError::Missing))?;

        match keys.verify(&token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                warn!(error = %e, "rejected token");
                Err(AppError::Auth(e))
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}
