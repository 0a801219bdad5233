//! Route handlers
//!
//! Handlers are thin: extract, call one facade operation, serialize. Domain
//! errors become responses through [`ApiError`](crate::error::ApiError).

pub mod session;
pub mod sites;
pub mod threads;

use crate::auth::AuthUser;
use crate::error::{ApiResult, ApiError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use pelilauta_core::schema::{Channel, Notification, Profile, TagIndexEntry};
use pelilauta_core::Error;
use serde_json::{json, Value};
use tracing::instrument;

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/meta/channels`
pub async fn list_channels(State(state): State<AppState>) -> ApiResult<Json<Vec<Channel>>> {
    Ok(Json(state.meta().channels()?.topics))
}

/// `GET /api/tags/:tag`
#[instrument(skip(state))]
pub async fn tag_entries(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> ApiResult<Json<Vec<TagIndexEntry>>> {
    Ok(Json(state.tags().entries_for_tag(&tag)?))
}

/// `GET /api/profiles/:uid`
pub async fn get_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<Profile>> {
    state
        .profiles()
        .get_profile(&uid)?
        .map(Json)
        .ok_or_else(|| ApiError::from(Error::not_found(format!("profiles/{}", uid))))
}

/// `GET /api/notifications`
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.notifications().list_notifications(&user.uid)?))
}
