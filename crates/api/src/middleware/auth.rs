//! Bearer-token extractor guarding the job endpoints.
//!
//! The token is decoded into typed [`Claims`](crate::auth::jwt::Claims) once
//! here; handlers only ever see the resulting [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use fitness_core::error::CoreError;
use fitness_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The athlete or admin on whose behalf a job request is made.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Internal user id, taken from the token subject.
    pub user_id: DbId,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Pull the raw token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid text"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(path = %parts.uri.path(), error = %e, "Rejected bearer token");
            unauthorized("Invalid or expired token")
        })?;

        tracing::Span::current().record("user_id", claims.sub);
        tracing::debug!(user_id = claims.sub, path = %parts.uri.path(), "Authenticated request");

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
