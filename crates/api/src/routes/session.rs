//! Session cookie routes
//!
//! `POST` exchanges a bearer token for an HTTP-only session cookie holding
//! the same token; `DELETE` clears it. The cookie is verified again on
//! every request, so clearing it is all a logout needs.

use crate::auth::{bearer_token, clear_session_cookie, session_cookie};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::AppendHeaders,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

/// `POST /api/auth/session`
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<(AppendHeaders<[(header::HeaderName, String); 1]>, Json<Value>)> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthenticated)?;
    let Some(uid) = state.verifier().verify(&token) else {
        warn!(target: "pelilauta::auth", "Session requested with an invalid token");
        return Err(ApiError::Unauthenticated);
    };
    info!(target: "pelilauta::auth", uid = %uid, "Session created");
    let cookie = session_cookie(&state.config().auth, &token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "uid": uid })),
    ))
}

/// `DELETE /api/auth/session`
pub async fn clear_session(
    State(state): State<AppState>,
) -> (AppendHeaders<[(header::HeaderName, String); 1]>, Json<Value>) {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.config().auth))]),
        Json(json!({ "status": "ok" })),
    )
}
