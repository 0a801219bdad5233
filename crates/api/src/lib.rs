//! HTTP JSON surface of Pelilauta
//!
//! An axum [`Router`] over the community primitives. Every route is a thin
//! handler: extract the path, query, body and caller, run one facade
//! operation, serialize the result.
//!
//! ## Errors
//!
//! Facade errors become `{"error": "<message>"}` bodies: not found is 404,
//! bad input and duplicates are 400, auth failures are 401, the rest 500.
//!
//! ## Auth
//!
//! Routes that change data take an [`AuthUser`], resolved from a bearer
//! token or the session cookie through the configured [`TokenVerifier`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod cache;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, ConfigTokenVerifier, TokenVerifier};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use anyhow::Context;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use pelilauta_engine::Database;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Router with every API route and the CORS and trace layers
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/meta/channels", get(routes::list_channels))
        .route(
            "/api/threads",
            get(routes::threads::list_threads).post(routes::threads::create_thread),
        )
        .route(
            "/api/threads/:thread_key",
            get(routes::threads::get_thread).delete(routes::threads::delete_thread),
        )
        .route(
            "/api/threads/:thread_key/replies",
            get(routes::threads::list_replies).post(routes::threads::add_reply),
        )
        .route(
            "/api/replies/:thread_key/:reply_key",
            get(routes::threads::get_reply).delete(routes::threads::delete_reply),
        )
        .route("/api/reactions/:key/love", post(routes::threads::toggle_love))
        .route("/api/sites", get(routes::sites::list_sites))
        .route("/api/sites/:site_key", get(routes::sites::get_site))
        .route("/api/sites/:site_key/pages.json", get(routes::sites::list_pages))
        .route(
            "/api/sites/:site_key/pages/:page_key",
            get(routes::sites::get_page).put(routes::sites::update_page),
        )
        .route("/api/tags/:tag", get(routes::tag_entries))
        .route("/api/profiles/:uid", get(routes::get_profile))
        .route("/api/notifications", get(routes::list_notifications))
        .route(
            "/api/auth/session",
            post(routes::session::create_session).delete(routes::session::clear_session),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on the configured bind address until a shutdown signal
///
/// The database is flushed once the server has drained.
pub async fn serve(db: Arc<Database>) -> anyhow::Result<()> {
    let address = db.config().bind.clone();
    let app = router(AppState::from_database(db.clone()));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(target: "pelilauta::api", %address, persistence = ?db.persistence_mode(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!(target: "pelilauta::api", "Server shutting down");
    if let Some(snapshot) = db.flush()? {
        info!(
            target: "pelilauta::api",
            path = %snapshot.path.display(),
            documents = snapshot.documents,
            "Snapshot written"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!(target: "pelilauta::api", "Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(target: "pelilauta::api", error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!(target: "pelilauta::api", "Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(target: "pelilauta::api", error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
