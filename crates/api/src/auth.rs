//! Request authentication
//!
//! A request proves its user with an ID token, sent either as
//! `Authorization: Bearer <token>` or in the session cookie that
//! `POST /api/auth/session` sets. Tokens are resolved to a uid by a
//! [`TokenVerifier`]; the server ships [`ConfigTokenVerifier`], which reads
//! the `[auth.tokens]` table of the configuration.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use cookie::{time::Duration, Cookie, SameSite};
use pelilauta_engine::AuthConfig;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolves an ID token to the uid it was issued for
pub trait TokenVerifier: Send + Sync {
    /// The token's uid, `None` when the token is not valid
    fn verify(&self, token: &str) -> Option<String>;
}

/// Verifier backed by a static token table
#[derive(Debug, Clone, Default)]
pub struct ConfigTokenVerifier {
    tokens: BTreeMap<String, String>,
}

impl ConfigTokenVerifier {
    /// Verifier accepting the given token → uid pairs
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Verifier for the `[auth.tokens]` table
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::new(auth.tokens.clone())
    }
}

impl TokenVerifier for ConfigTokenVerifier {
    fn verify(&self, token: &str) -> Option<String> {
        self.tokens
            .get(token)
            .filter(|uid| !uid.trim().is_empty())
            .cloned()
    }
}

/// Token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Token stored in the session cookie
pub fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value.to_string()))
        .filter_map(|parsed| parsed.ok())
        .find(|c| c.name() == cookie_name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// `Set-Cookie` value that stores `token` as the session
pub fn session_cookie(auth: &AuthConfig, token: &str) -> String {
    Cookie::build((auth.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(i64::from(auth.cookie_max_age_days)))
        .build()
        .to_string()
}

/// `Set-Cookie` value that clears the session
pub fn clear_session_cookie(auth: &AuthConfig) -> String {
    Cookie::build((auth.cookie_name.clone(), String::new()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

/// The authenticated caller of a request
///
/// Handlers taking an `AuthUser` reject unauthenticated requests with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Verified user id
    pub uid: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_token(&parts.headers, &state.config().auth.cookie_name))
            .ok_or(ApiError::Unauthenticated)?;
        match state.verifier().verify(&token) {
            Some(uid) => Ok(AuthUser { uid }),
            None => {
                debug!(target: "pelilauta::auth", path = %parts.uri.path(), "Rejected token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
