#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Path, Query};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use punch_proxy::config::ProxyConfig;
use punch_proxy::router::build_app_router;
use punch_proxy::state::AppState;

pub const PASSWORD: &str = "pw";

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null)
}

async fn list_submissions(headers: HeaderMap) -> Json<Value> {
    Json(json!({"authorization": header(&headers, AUTHORIZATION), "count": 0, "results": []}))
}

async fn create_submission(headers: HeaderMap, body: Bytes) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "content_type": header(&headers, CONTENT_TYPE),
            "body_len": body.len(),
            "body": String::from_utf8_lossy(&body),
        })),
    )
        .into_response()
}

async fn get_submission(Path(id): Path<i64>) -> Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    Json(json!({"id": id})).into_response()
}

async fn judge(headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "authorization": header(&headers, AUTHORIZATION),
            "id": 70,
            "submission_id": id,
            "judgment": body["judgment"],
            "metaphor_comment": body["metaphor_comment"],
        })),
    )
        .into_response()
}

async fn ranking(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({"type": query.get("type")}))
}

async fn admin_submissions() -> Json<Value> {
    Json(json!([]))
}

async fn admin_reports() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({"detail": "You do not have permission."}))).into_response()
}

async fn token(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }
    Json(json!({"access": "access-token", "refresh": "refresh-token", "user_id": 7})).into_response()
}

fn fake_backend() -> Router {
    Router::new()
        .route(
            "/api/submissions/",
            get(list_submissions)
                .post(create_submission)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/api/submissions/{id}/", get(get_submission))
        .route("/api/submissions/{id}/judge/", post(judge))
        .route("/api/ranking/", get(ranking))
        .route("/api/admin/submissions/", get(admin_submissions))
        .route("/api/admin/reports/", get(admin_reports))
        .route("/api/token/", post(token))
}

/// Serve the fake backend on an ephemeral port and return its origin.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake_backend()).await.unwrap();
    });
    format!("http://{addr}")
}

/// Proxy router pointed at `upstream_url`.
pub fn build_test_app(upstream_url: &str) -> Router {
    build_app_router(AppState::new(ProxyConfig::for_upstream(upstream_url)))
}

/// Proxy router in front of a freshly spawned fake backend.
pub async fn proxy() -> Router {
    build_test_app(&spawn_backend().await)
}

pub async fn get_path(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
