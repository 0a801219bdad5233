//! Thread, reply and reaction routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use pelilauta_core::schema::{Reactions, Reply, Thread};
use pelilauta_core::Error;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Threads returned when the query gives no limit
pub const DEFAULT_THREAD_LIMIT: usize = 20;

/// Upper bound for `limit`
pub const MAX_THREAD_LIMIT: usize = 200;

/// Query of `GET /api/threads`
#[derive(Debug, Default, Deserialize)]
pub struct ListThreadsQuery {
    /// Only threads of this channel
    pub channel: Option<String>,
    /// Maximum number of threads
    pub limit: Option<usize>,
}

/// `GET /api/threads`, public threads only
#[instrument(skip(state))]
pub async fn list_threads(
    State(state): State<AppState>,
    Query(query): Query<ListThreadsQuery>,
) -> ApiResult<Json<Vec<Thread>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_THREAD_LIMIT)
        .min(MAX_THREAD_LIMIT);
    let threads = state
        .threads()
        .list_threads(query.channel.as_deref(), limit, false)?;
    Ok(Json(threads))
}

/// `POST /api/threads`
#[instrument(skip_all, fields(uid = %user.uid))]
pub async fn create_thread(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = payload?;
    let thread = state.threads().create_thread(&user.uid, &body)?;
    info!(target: "pelilauta::api", key = %thread.key, channel = %thread.channel, "Thread created");
    Ok((StatusCode::CREATED, Json(json!({ "key": thread.key }))))
}

/// `GET /api/threads/:thread_key`
pub async fn get_thread(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Thread>> {
    Ok(Json(state.threads().require_thread(&key)?))
}

/// `DELETE /api/threads/:thread_key`
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn delete_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    state.threads().delete_thread(&user.uid, &key)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/threads/:thread_key/replies`
pub async fn list_replies(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Vec<Reply>>> {
    state.threads().require_thread(&key)?;
    Ok(Json(state.replies().list_replies(&key)?))
}

/// `POST /api/threads/:thread_key/replies`
#[instrument(skip(state, user, payload), fields(uid = %user.uid))]
pub async fn add_reply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = payload?;
    let reply = state.replies().add_reply(&user.uid, &key, &body)?;
    Ok((StatusCode::CREATED, Json(json!({ "key": reply.key }))))
}

/// Reply key of a `:reply_key.json` path segment
fn reply_key(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// `GET /api/replies/:thread_key/:reply_key.json`
pub async fn get_reply(
    State(state): State<AppState>,
    Path((thread_key, segment)): Path<(String, String)>,
) -> ApiResult<Json<Reply>> {
    let key = reply_key(&segment);
    state
        .replies()
        .get_reply(&thread_key, key)?
        .map(Json)
        .ok_or_else(|| {
            ApiError::from(Error::not_found(format!(
                "threads/{}/comments/{}",
                thread_key, key
            )))
        })
}

/// `DELETE /api/replies/:thread_key/:reply_key`
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn delete_reply(
    State(state): State<AppState>,
    user: AuthUser,
    Path((thread_key, segment)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .replies()
        .delete_reply(&user.uid, &thread_key, reply_key(&segment))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/reactions/:key/love`
pub async fn toggle_love(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<Reactions>> {
    Ok(Json(state.reactions().toggle_love(&user.uid, &key)?))
}
