//! Tiered cache headers
//!
//! Listings served to the wiki renderer are cached at three layers, each
//! holding the response longer than the one before it: the shared cache
//! (`s-maxage`, revalidated in the background), the CDN and the edge.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use pelilauta_engine::CacheConfig;

/// `CDN-Cache-Control`
pub const CDN_CACHE_CONTROL: HeaderName = HeaderName::from_static("cdn-cache-control");

/// `Vercel-CDN-Cache-Control`
pub const EDGE_CACHE_CONTROL: HeaderName = HeaderName::from_static("vercel-cdn-cache-control");

/// Headers for a cacheable listing
pub fn tiered_headers(cache: &CacheConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        header::CACHE_CONTROL,
        format!("s-maxage={}, stale-while-revalidate", cache.s_maxage),
    );
    insert(
        &mut headers,
        CDN_CACHE_CONTROL,
        format!("public, max-age={}", cache.cdn_max_age),
    );
    insert(
        &mut headers,
        EDGE_CACHE_CONTROL,
        format!("public, max-age={}", cache.edge_max_age),
    );
    headers
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    // values are ASCII digits and fixed text
    if let Ok(value) = HeaderValue::try_from(value) {
        headers.insert(name, value);
    }
}
