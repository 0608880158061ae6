//! Expiry-aware background token refresh.
//!
//! [`RefreshScheduler`] owns at most one background task. Each cycle it
//! sleeps until shortly before the access token's `exp` (or the fallback
//! interval for tokens without one), then trades the refresh token for a
//! new access token. The task exits when its [`CancellationToken`] fires.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use punch_core::models::{RefreshRequest, RefreshResponse};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::config::RefreshSettings;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::jwt;
use crate::session::SignOutReason;

pub const REFRESH_ENDPOINT: &str = "/api/token/refresh/";

/// Trade the session's refresh token for a new access token.
///
/// Fails with [`ApiError::AuthenticationFailed`] when there is no refresh
/// token, when the server rejects it, or when the session was signed out
/// while the call was in flight.
pub async fn refresh_access_token(http: &HttpClient) -> Result<(), ApiError> {
    let Some(refresh) = http.session().refresh_token().await else {
        return Err(ApiError::AuthenticationFailed);
    };

    let response: RefreshResponse = http
        .request_anonymous(Method::POST, REFRESH_ENDPOINT, Some(&RefreshRequest { refresh }))
        .await?;

    if !http.session().replace_tokens(response.access, response.refresh).await {
        tracing::debug!("Session ended during refresh, discarding new token");
        return Err(ApiError::AuthenticationFailed);
    }
    Ok(())
}

/// Handle to the background refresh task.
pub struct RefreshScheduler {
    http: HttpClient,
    settings: RefreshSettings,
    running: Mutex<Option<CancellationToken>>,
}

impl RefreshScheduler {
    pub fn new(http: HttpClient, settings: RefreshSettings) -> Self {
        Self {
            http,
            settings,
            running: Mutex::new(None),
        }
    }

    /// Start refreshing in the background, replacing any running task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.slot().replace(cancel.clone()) {
            previous.cancel();
        }

        tracing::debug!("Refresh scheduler started");
        tokio::spawn(run(self.http.clone(), self.settings, cancel));
    }

    /// Cancel the background task. Calling this when nothing runs is a no-op.
    pub fn stop(&self) {
        if let Some(cancel) = self.slot().take() {
            cancel.cancel();
            tracing::debug!("Refresh scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot().as_ref().is_some_and(|cancel| !cancel.is_cancelled())
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The refresh loop. Failures are logged and retried after
/// `settings.retry_interval`; they never end the session. A missing
/// refresh token does.
async fn run(http: HttpClient, settings: RefreshSettings, cancel: CancellationToken) {
    let mut last_failed = false;

    loop {
        let delay = if last_failed {
            settings.retry_interval
        } else {
            next_delay(&http, &settings).await
        };
        tracing::debug!(delay_secs = delay.as_secs(), "Next token refresh scheduled");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Refresh loop cancelled");
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        if http.session().refresh_token().await.is_none() {
            tracing::warn!("Refresh due but no refresh token stored, signing out");
            cancel.cancel();
            http.session().sign_out(SignOutReason::RefreshUnavailable).await;
            return;
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            result = refresh_access_token(&http) => match result {
                Ok(()) => {
                    tracing::info!("Access token refreshed");
                    last_failed = false;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_secs = settings.retry_interval.as_secs(),
                        "Scheduled token refresh failed",
                    );
                    last_failed = true;
                }
            }
        }
    }
}

async fn next_delay(http: &HttpClient, settings: &RefreshSettings) -> Duration {
    match http.session().access_token().await {
        Some(token) => jwt::refresh_delay(&token, Utc::now(), settings),
        None => settings.fallback_interval,
    }
}
