//! HTTP wrapper shared by every API call.
//!
//! [`HttpClient`] resolves endpoints against the base URL, attaches
//! `Authorization: Bearer <token>` whenever the session holds an access
//! token, and maps responses onto [`ApiError`]: 401 becomes
//! [`ApiError::AuthenticationFailed`] without touching the body, other
//! non-2xx statuses become [`ApiError::Network`].

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::multipart::MultipartForm;
use crate::session::SessionContext;

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// Cheaply cloneable handle; clones share the connection pool and session.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl HttpClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config.api_url.clone(), session))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, session: Arc<SessionContext>) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode the JSON response as `T`.
    ///
    /// `body`, when present, is sent as JSON with
    /// `Content-Type: application/json`.
    pub async fn request<T, B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(method, endpoint, body, Auth::Bearer).await
    }

    /// `GET` without a body.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, endpoint, None).await
    }

    /// Like [`request`](Self::request) but never attaches the bearer token.
    ///
    /// Used for the token refresh call: the backend's JWT authentication
    /// rejects a stale bearer even on endpoints open to anonymous callers.
    pub async fn request_anonymous<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(method, endpoint, body, Auth::Anonymous).await
    }

    /// Send a hand-built multipart form and decode the JSON response.
    pub async fn upload<T>(&self, method: Method, endpoint: &str, form: &MultipartForm) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint)?;
        let builder = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, form.content_type())
            .body(form.to_bytes());
        let builder = self.authorize(builder, Auth::Bearer).await;

        tracing::debug!(%method, endpoint, parts = form.part_count(), "Uploading form");
        let response = builder.send().await?;
        decode_response(&method, endpoint, response).await
    }

    // ---- private helpers ----

    async fn send_json<T, B>(&self, method: Method, endpoint: &str, body: Option<&B>, auth: Auth) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint)?;
        let mut builder = self.client.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder, auth).await;

        tracing::debug!(%method, endpoint, "API request");
        let response = builder.send().await?;
        decode_response(&method, endpoint, response).await
    }

    fn url(&self, endpoint: &str) -> Result<reqwest::Url, ApiError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        reqwest::Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn authorize(&self, builder: reqwest::RequestBuilder, auth: Auth) -> reqwest::RequestBuilder {
        if auth == Auth::Anonymous {
            return builder;
        }
        match self.session.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Map a response onto the expected payload or an [`ApiError`].
async fn decode_response<T: DeserializeOwned>(
    method: &Method,
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    tracing::debug!(%method, endpoint, status = status.as_u16(), "API response");

    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!(%method, endpoint, "Request rejected with 401");
        return Err(ApiError::AuthenticationFailed);
    }

    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = upstream_message(status, &bytes);
        tracing::warn!(%method, endpoint, status = status.as_u16(), error = %message, "API request failed");
        return Err(ApiError::Network(message));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::NoData);
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(%method, endpoint, error = %e, "Response did not match expected shape");
        ApiError::Decoding(e)
    })
}

/// Pull the human-readable message out of an error body.
///
/// DRF answers `{"error": ...}` from hand-written views and
/// `{"detail": ...}` from its own exception handler. Anything else falls
/// back to the status line.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "detail"] {
            if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    format!("HTTP {}", status.as_u16())
}
