//! Forwarding requests to the backend.

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method};
use axum::response::Response;
use reqwest::Url;
use serde::Serialize;

use crate::error::{ProxyError, ProxyResult};

/// Request headers copied onto the upstream request.
const FORWARDED_HEADERS: [HeaderName; 2] = [AUTHORIZATION, CONTENT_TYPE];

/// Handle to the backend: one connection pool, one base URL.
pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
}

impl Upstream {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` (which starts with `/api/`) against the backend origin.
    pub fn url(&self, path: &str) -> ProxyResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ProxyError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Send the request upstream and relay the answer unchanged.
    ///
    /// Only connection-level failures become errors; a 4xx or 5xx from the
    /// backend is returned as is.
    pub async fn forward(&self, method: Method, url: Url, headers: &HeaderMap, body: Bytes) -> ProxyResult<Response> {
        tracing::debug!(%method, path = url.path(), "Forwarding request");

        let mut request = self.client.request(method, url);
        for name in FORWARDED_HEADERS {
            if let Some(value) = headers.get(&name) {
                request = request.header(name, value.clone());
            }
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        relay(request.send().await?).await
    }

    /// `POST` a JSON body, returning the raw upstream response.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> ProxyResult<reqwest::Response> {
        Ok(self.client.post(url).json(body).send().await?)
    }
}

/// Turn an upstream response into ours: same status, same body, same
/// `Content-Type`.
pub async fn relay(upstream: reqwest::Response) -> ProxyResult<Response> {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "Relaying upstream error");
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}
