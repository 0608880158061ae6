//! `/api/django/*`: straight pass-through to the backend's `/api/*`.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use punch_core::models::RankingKind;
use punch_core::types::DbId;
use serde::Deserialize;

use crate::error::ProxyResult;
use crate::state::AppState;

/// Board used when the caller does not pick one.
const DEFAULT_RANKING: RankingKind = RankingKind::Weekly;

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

async fn list_submissions(State(state): State<AppState>, headers: HeaderMap) -> ProxyResult<Response> {
    let url = state.upstream.url("/api/submissions/")?;
    state.upstream.forward(Method::GET, url, &headers, Bytes::new()).await
}

/// The multipart body is relayed untouched together with its boundary.
async fn create_submission(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ProxyResult<Response> {
    let url = state.upstream.url("/api/submissions/")?;
    state.upstream.forward(Method::POST, url, &headers, body).await
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
) -> ProxyResult<Response> {
    let url = state.upstream.url(&format!("/api/submissions/{id}/"))?;
    state.upstream.forward(Method::GET, url, &headers, Bytes::new()).await
}

async fn judge_submission(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResult<Response> {
    let url = state.upstream.url(&format!("/api/submissions/{id}/judge/"))?;
    state.upstream.forward(Method::POST, url, &headers, body).await
}

async fn ranking(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
    headers: HeaderMap,
) -> ProxyResult<Response> {
    let kind = query
        .kind
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_RANKING.as_str().to_string());

    let mut url = state.upstream.url("/api/ranking/")?;
    url.query_pairs_mut().append_pair("type", &kind);
    state.upstream.forward(Method::GET, url, &headers, Bytes::new()).await
}

async fn admin_submissions(State(state): State<AppState>, headers: HeaderMap) -> ProxyResult<Response> {
    let url = state.upstream.url("/api/admin/submissions/")?;
    state.upstream.forward(Method::GET, url, &headers, Bytes::new()).await
}

async fn admin_reports(State(state): State<AppState>, headers: HeaderMap) -> ProxyResult<Response> {
    let url = state.upstream.url("/api/admin/reports/")?;
    state.upstream.forward(Method::GET, url, &headers, Bytes::new()).await
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/submissions",
            get(list_submissions)
                .post(create_submission)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/submissions/{id}", get(get_submission))
        .route("/submissions/{id}/judge", post(judge_submission))
        .route("/ranking", get(ranking))
        .route("/admin/submissions", get(admin_submissions))
        .route("/admin/reports", get(admin_reports))
}
