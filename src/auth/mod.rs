use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domain::Viewer;
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::AppState;

/// Extractor for endpoints that require an authenticated caller.
/// Rejects with 401 when no valid bearer token is presented.
pub struct CurrentUser(pub User);

/// Extractor for endpoints that are open but viewer-aware. A missing
/// Authorization header yields an anonymous viewer; a malformed header or an
/// unknown token is still rejected with 401.
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn viewer(&self) -> Viewer {
        match &self.0 {
            Some(user) => Viewer::User(user.id),
            None => Viewer::Anonymous,
        }
    }
}

async fn user_from_header(state: &AppState, parts: &Parts) -> Result<Option<User>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::AuthError("Malformed Authorization header".to_string()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE api_token = $1")
        .bind(token)
        .fetch_optional(&state.pool)
        .await?;

    match user {
        Some(user) => Ok(Some(user)),
        None => Err(AppError::AuthError("Invalid API token".to_string())),
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match user_from_header(state, parts).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::AuthError("Authentication required".to_string())),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(user_from_header(state, parts).await?))
    }
}
