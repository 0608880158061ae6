use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failures of the proxy itself. Upstream error statuses are not errors
/// here; they are passed back verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The backend could not be reached or the connection broke mid-response.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The configured backend URL plus route did not form a valid URL.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// The backend answered 2xx with a body of the wrong shape.
    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),
}

pub type ProxyResult<T> = Result<T, ProxyError>;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ProxyError::Upstream(err) => {
                tracing::error!(error = %err, "Upstream unreachable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_UNAVAILABLE",
                    "Failed to reach the punch backend",
                )
            }
            ProxyError::InvalidUrl(msg) => {
                tracing::error!(error = %msg, "Invalid upstream URL");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
            }
            ProxyError::UnexpectedResponse(msg) => {
                tracing::error!(error = %msg, "Unexpected upstream response");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_UPSTREAM_RESPONSE",
                    "The punch backend sent an unexpected response",
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
