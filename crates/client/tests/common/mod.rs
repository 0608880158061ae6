//! In-process fake of the punch backend for integration tests.
//!
//! Protected routes accept exactly one bearer token at a time
//! (`FakeBackend::valid_access`). The refresh route swaps it for
//! [`REFRESHED_ACCESS`] when given [`REFRESH_TOKEN`].

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use punch_client::config::ClientConfig;
use punch_client::{MemoryTokenStore, PunchApi, SessionContext, StoredTokens};

pub const LOGIN_ACCESS: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const REFRESHED_ACCESS: &str = "access-2";
pub const PASSWORD: &str = "correct horse";

/// A multipart request as the server saw it.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub valid_access: Mutex<String>,
    /// When set, the refresh route answers with this status instead.
    pub refresh_failure: Mutex<Option<StatusCode>>,
    /// Protected routes answer 401 whatever token is sent.
    pub reject_all: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub protected_calls: AtomicUsize,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub ranking_queries: Mutex<Vec<Option<String>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        *backend.valid_access.lock().unwrap() = LOGIN_ACCESS.to_string();
        Arc::new(backend)
    }

    /// Make the currently valid access token something no client holds.
    pub fn revoke_access(&self, replacement: &str) {
        *self.valid_access.lock().unwrap() = replacement.to_string();
    }

    pub fn fail_refresh_with(&self, status: StatusCode) {
        *self.refresh_failure.lock().unwrap() = Some(status);
    }

    pub fn reject_every_token(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn protected_calls(&self) -> usize {
        self.protected_calls.load(Ordering::SeqCst)
    }

    pub fn last_auth_header(&self) -> Option<String> {
        self.auth_headers.lock().unwrap().last().cloned().flatten()
    }

    /// Record the call and check its bearer token.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.protected_calls.fetch_add(1, Ordering::SeqCst);
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(header.clone());

        let expected = format!("Bearer {}", self.valid_access.lock().unwrap());
        if !self.reject_all.load(Ordering::SeqCst) && header.as_deref() == Some(expected.as_str()) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Given token not valid for any token type"})),
            )
                .into_response())
        }
    }
}

type Shared = State<Arc<FakeBackend>>;

pub fn user_json(username: &str) -> Value {
    json!({
        "id": 1,
        "email": format!("{username}@example.com"),
        "username": username,
        "first_name": "",
        "last_name": "",
        "is_active": true,
        "date_joined": "2024-01-01T00:00:00Z",
        "last_login": null
    })
}

pub fn submission_json(id: i64, owner: &str) -> Value {
    json!({
        "id": id,
        "user_username": owner,
        "image": format!("https://cdn.example.com/{id}.jpg"),
        "thumbnail": null,
        "watermarked_image": null,
        "description": "right hook",
        "is_judged": false,
        "created_at": "2024-03-01T12:00:00Z",
        "judgment": null
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"}))).into_response();
    }
    Json(json!({
        "access": LOGIN_ACCESS,
        "refresh": REFRESH_TOKEN,
        "user": user_json("puncher"),
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "User with this username already exists"})),
        )
            .into_response();
    }
    let username = body["username"].as_str().unwrap_or_default().to_string();
    (
        StatusCode::CREATED,
        Json(json!({
            "access": LOGIN_ACCESS,
            "refresh": REFRESH_TOKEN,
            "user": user_json(&username),
        })),
    )
        .into_response()
}

async fn refresh(State(backend): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    backend
        .auth_headers
        .lock()
        .unwrap()
        .push(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string));

    if let Some(status) = *backend.refresh_failure.lock().unwrap() {
        return (status, Json(json!({"detail": "refresh unavailable"}))).into_response();
    }
    if body["refresh"] != REFRESH_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response();
    }

    backend.revoke_access(REFRESHED_ACCESS);
    Json(json!({"access": REFRESHED_ACCESS})).into_response()
}

async fn list_submissions(State(backend): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(json!({
        "count": 3,
        "next": null,
        "previous": null,
        "results": [
            submission_json(1, "puncher"),
            submission_json(2, "someone_else"),
            submission_json(3, "puncher"),
        ]
    }))
    .into_response()
}

async fn create_submission(State(backend): Shared, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    backend.uploads.lock().unwrap().push(Upload {
        content_type,
        body: body.to_vec(),
    });
    (
        StatusCode::CREATED,
        Json(json!({"image": "https://cdn.example.com/new.jpg", "description": "uppercut"})),
    )
        .into_response()
}

async fn get_submission(State(backend): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    if id == 204 {
        return StatusCode::OK.into_response();
    }
    Json(submission_json(id, "puncher")).into_response()
}

async fn profile(State(backend): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(json!({
        "id": 5,
        "profile_image": null,
        "bio": "fast hands",
        "role": "JUDGE",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "username": "puncher",
        "email": "puncher@example.com"
    }))
    .into_response()
}

async fn rankings(
    State(backend): Shared,
    headers: HeaderMap,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    backend.ranking_queries.lock().unwrap().push(query.get("type").cloned());
    Json(json!([{
        "id": 1,
        "submission": submission_json(1, "puncher"),
        "ranking_type": query.get("type").cloned().unwrap_or_else(|| "weekly".into()),
        "rank": 1,
        "speed_kmh": 88.0,
        "created_at": "2024-03-03T00:00:00Z"
    }]))
    .into_response()
}

async fn notifications(State(backend): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(json!([
        {
            "id": 3,
            "type": "APPROVAL",
            "title": "Judged",
            "message": "Your punch clocked 88 km/h",
            "is_read": false,
            "created_at": "2024-03-03T00:00:00Z"
        },
        {
            "id": 4,
            "type": "SYSTEM",
            "title": "Maintenance",
            "message": "Back soon",
            "is_read": true,
            "created_at": "2024-03-04T00:00:00Z"
        }
    ]))
    .into_response()
}

async fn mark_read(State(backend): Shared, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(json!({"status": "success"})).into_response()
}

async fn judge(State(backend): Shared, headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    // A rejection removes the submission before the response is written.
    let (judgment_id, submission_id) = if body["judgment"] == "REJECTED" {
        (Value::Null, Value::Null)
    } else {
        (json!(70), json!(id))
    };
    (
        StatusCode::CREATED,
        Json(json!({
            "id": judgment_id,
            "submission_id": submission_id,
            "judgment": body["judgment"],
            "speed_kmh": body["speed_kmh"],
            "metaphor_comment": body["metaphor_comment"],
            "rejection_reason": body["rejection_reason"],
            "judge_name": "judge",
            "created_at": "2024-03-05T00:00:00Z"
        })),
    )
        .into_response()
}

async fn admin_reports(State(backend): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "database unavailable"}))).into_response()
}

pub fn router(backend: Arc<FakeBackend>) -> Router {
    Router::new()
        .route("/api/auth/jwt/login/", post(login))
        .route("/api/auth/jwt/register/", post(register))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/submissions/", get(list_submissions).post(create_submission))
        .route("/api/submissions/{id}/", get(get_submission))
        .route("/api/submissions/{id}/judge/", post(judge))
        .route("/api/profile/", get(profile))
        .route("/api/ranking/", get(rankings))
        .route("/api/notifications/", get(notifications))
        .route("/api/notifications/{id}/read/", patch(mark_read))
        .route("/api/admin/reports/", get(admin_reports))
        .with_state(backend)
}

/// Serve the fake on an ephemeral port and return its base URL.
pub async fn spawn_backend(backend: Arc<FakeBackend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client whose session was restored from `tokens`.
pub fn client(base_url: &str, tokens: StoredTokens) -> (PunchApi, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(tokens));
    let session = Arc::new(SessionContext::restore(store.clone()));
    let api = PunchApi::new(&ClientConfig::new(base_url), session).unwrap();
    (api, store)
}

/// Client with a fresh login against a new fake backend.
pub async fn signed_in() -> (PunchApi, Arc<MemoryTokenStore>, Arc<FakeBackend>) {
    let backend = FakeBackend::new();
    let base_url = spawn_backend(backend.clone()).await;
    let (api, store) = client(&base_url, StoredTokens::default());
    api.login("puncher@example.com", PASSWORD).await.unwrap();
    (api, store, backend)
}
