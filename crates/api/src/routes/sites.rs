//! Site and page routes

use crate::auth::AuthUser;
use crate::cache::tiered_headers;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use pelilauta_core::schema::{Page, Site};
use serde_json::Value;
use tracing::instrument;

/// `GET /api/sites`
pub async fn list_sites(State(state): State<AppState>) -> ApiResult<Json<Vec<Site>>> {
    Ok(Json(state.sites().list_sites(false)?))
}

/// `GET /api/sites/:site_key`
pub async fn get_site(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Site>> {
    Ok(Json(state.sites().require_site(&key)?))
}

/// `GET /api/sites/:site_key/pages.json`
///
/// Served with tiered cache headers from `[cache]`.
pub async fn list_pages(
    State(state): State<AppState>,
    Path(site_key): Path<String>,
) -> ApiResult<(HeaderMap, Json<Vec<Page>>)> {
    state.sites().require_site(&site_key)?;
    let pages = state.pages().list_pages(&site_key)?;
    Ok((tiered_headers(&state.config().cache), Json(pages)))
}

/// `GET /api/sites/:site_key/pages/:page_key`
pub async fn get_page(
    State(state): State<AppState>,
    Path((site_key, page_key)): Path<(String, String)>,
) -> ApiResult<Json<Page>> {
    Ok(Json(state.pages().require_page(&site_key, &page_key)?))
}

/// `PUT /api/sites/:site_key/pages/:page_key`
#[instrument(skip(state, user, payload), fields(uid = %user.uid))]
pub async fn update_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path((site_key, page_key)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Page>> {
    let Json(patch) = payload?;
    let page = state
        .pages()
        .update_page(&user.uid, &site_key, &page_key, &patch)?;
    Ok(Json(page))
}
