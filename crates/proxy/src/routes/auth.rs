//! `/api/auth/jwt-login`: username/password in, bare token pair out.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use punch_core::models::{TokenPair, TokenPairRequest};

use crate::error::{ProxyError, ProxyResult};
use crate::state::AppState;
use crate::upstream::relay;

/// Exchange credentials at the backend's `/api/token/`.
///
/// A rejection is relayed with the backend's status and body. On success
/// only `access` and `refresh` are passed on.
async fn jwt_login(State(state): State<AppState>, Json(credentials): Json<TokenPairRequest>) -> ProxyResult<Response> {
    tracing::info!(username = %credentials.username, "JWT login");

    let url = state.upstream.url("/api/token/")?;
    let upstream = state.upstream.post_json(url, &credentials).await?;

    if !upstream.status().is_success() {
        tracing::warn!(status = upstream.status().as_u16(), "JWT login rejected upstream");
        return relay(upstream).await;
    }

    let bytes = upstream.bytes().await?;
    let pair: TokenPair =
        serde_json::from_slice(&bytes).map_err(|e| ProxyError::UnexpectedResponse(e.to_string()))?;
    Ok(Json(pair).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/jwt-login", post(jwt_login))
}
