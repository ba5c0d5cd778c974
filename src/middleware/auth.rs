use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{dto::auth::Claims, error::AppError, state::AppState};

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Requester identity on routes that also serve anonymous clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|user| user.user_id)
    }
}

/// Only the author of a recipe may change or delete it.
pub fn ensure_author(user: &AuthUser, author_id: Option<i32>) -> Result<(), AppError> {
    if author_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn issue_token(secret: &str, user_id: i32) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_token(secret: &str, token: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(AuthUser { user_id })
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

    // Accept both the JWT-style and the legacy `Token` scheme.
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("Token "))
        .ok_or(AppError::Unauthorized)?
        .trim();

    Ok(Some(token))
}

/// First link of the auth chain: resolves the requester from the bearer
/// token, if any, and stores it in the request extensions. A malformed or
/// expired token is rejected even on public routes.
pub async fn authenticate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    if let Some(token) = bearer_token(&parts)? {
        let user = verify_token(&state.config.jwt_secret, token)?;
        parts.extensions.insert(user);
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Capability check for routes that need an authenticated requester.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<AuthUser>().is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthUser>().copied()))
    }
}
