/**
 * Authentication Extractors
 *
 * Pull the session token from the `Authorization` header and resolve it to a
 * username that still names an account. Both `Token <jwt>` (Conduit) and `Bearer <jwt>` are accepted.
 *
 * - `AuthUser` requires a valid token: a missing or invalid one is a 401.
 * - `MaybeAuthUser` is anonymous when the header is absent, but still a 401
 *   when a token is present and invalid.
 */

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::AuthService;
use crate::backend::error::BackendError;

/// Authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    /// The raw token the request carried
    pub token: String,
}

/// Caller that may be anonymous
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.username.as_str())
    }
}

/// The token from the `Authorization` header, `None` when there is no header
fn extract_token(headers: &HeaderMap) -> Result<Option<String>, BackendError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| {
        tracing::warn!("Non-ASCII Authorization header");
        BackendError::unauthorized("invalid authorization header")
    })?;

    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            BackendError::unauthorized("invalid authorization header")
        })
}

async fn authenticate<S>(token: String, state: &S) -> Result<AuthUser, BackendError>
where
    AuthService: FromRef<S>,
{
    let auth = AuthService::from_ref(state);
    let username = auth.authenticate(&token).await?;
    Ok(AuthUser { username, token })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?.ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("missing authorization token")
        })?;
        authenticate(token, state).await
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract_token(&parts.headers)? {
            Some(token) => Ok(Self(Some(authenticate(token, state).await?))),
            None => Ok(Self(None)),
        }
    }
}
