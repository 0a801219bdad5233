//! HTTP error mapping
//!
//! Domain errors travel unchanged from the facades to the handler, which
//! turns them into a status code and a `{"error": "<message>"}` body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pelilauta_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors a handler can return
#[derive(Error, Debug)]
pub enum ApiError {
    /// Error raised by a facade or the store
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Request carried no valid credentials
    #[error("authentication required")]
    Unauthenticated,

    /// Body was not the JSON the route expects
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl ApiError {
    /// Status code sent for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e {
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::AlreadyExists(_)
                | CoreError::Validation(_)
                | CoreError::InvalidKey(_)
                | CoreError::Limit(_) => StatusCode::BAD_REQUEST,
                CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CoreError::Serialization(_) | CoreError::Io(_) | CoreError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: "pelilauta::api", error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result alias for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
