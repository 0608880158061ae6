//! Typed surface over the backend's REST endpoints.
//!
//! Every authenticated call goes through [`PunchApi::authorized`], which
//! refreshes once on a 401 and retries once. Login, register and the token
//! pair call establish the session and start the [`RefreshScheduler`];
//! [`PunchApi::logout`] and any irrecoverable 401 tear both down.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use punch_core::models::{
    AuthResponse, JudgeRequest, Judgment, LoginRequest, MessageAck, Notification, Page,
    PasswordResetRequest, Ranking, RankingKind, RegisterRequest, Report, ReportRequest,
    StatusAck, Submission, SubmissionReceipt, TokenPair, TokenPairRequest, User, UserProfile,
};
use punch_core::types::DbId;
use reqwest::Method;

use crate::config::{ClientConfig, RefreshSettings};
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::multipart::{profile_form, submission_form};
use crate::refresh::{self, RefreshScheduler};
use crate::retry::retry_once_on_auth;
use crate::session::{SessionContext, SignOutReason};
use crate::token_store::FileTokenStore;

const LOGIN_ENDPOINT: &str = "/api/auth/jwt/login/";
const REGISTER_ENDPOINT: &str = "/api/auth/jwt/register/";
const TOKEN_PAIR_ENDPOINT: &str = "/api/token/";
const RESET_PASSWORD_ENDPOINT: &str = "/api/auth/reset-password/";
const SUBMISSIONS_ENDPOINT: &str = "/api/submissions/";
const PROFILE_ENDPOINT: &str = "/api/profile/";
const RANKING_ENDPOINT: &str = "/api/ranking/";
const NOTIFICATIONS_ENDPOINT: &str = "/api/notifications/";
const ADMIN_SUBMISSIONS_ENDPOINT: &str = "/api/admin/submissions/";
const ADMIN_REPORTS_ENDPOINT: &str = "/api/admin/reports/";

/// Client for the punch backend. Clones share the session, the connection
/// pool and the refresh task.
#[derive(Clone)]
pub struct PunchApi {
    http: HttpClient,
    scheduler: Arc<RefreshScheduler>,
}

impl PunchApi {
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        let http = HttpClient::new(config, session)?;
        Ok(Self::with_http(http, config.refresh))
    }

    /// Build a client whose session is restored from `config.token_file`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
        Self::new(config, Arc::new(SessionContext::restore(store)))
    }

    pub fn with_http(http: HttpClient, settings: RefreshSettings) -> Self {
        let scheduler = Arc::new(RefreshScheduler::new(http.clone(), settings));
        Self { http, scheduler }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.http.session()
    }

    /// Whether the background refresh task is active.
    pub fn is_refreshing(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Start background refresh for a session restored from storage.
    ///
    /// Returns `false` when there is no refresh token to work with.
    pub async fn resume(&self) -> bool {
        if self.session().refresh_token().await.is_none() {
            return false;
        }
        self.scheduler.start();
        true
    }

    // ---- authentication ----

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.http.request(Method::POST, LOGIN_ENDPOINT, Some(&body)).await?;
        Ok(self.establish(auth).await)
    }

    pub async fn register(&self, email: &str, password: &str, username: &str) -> Result<User, ApiError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
        };
        let auth: AuthResponse = self.http.request(Method::POST, REGISTER_ENDPOINT, Some(&body)).await?;
        Ok(self.establish(auth).await)
    }

    /// Sign in with the plain username/password token endpoint. The
    /// backend sends no account snapshot on this route.
    pub async fn obtain_token_pair(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let body = TokenPairRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let pair: TokenPair = self.http.request(Method::POST, TOKEN_PAIR_ENDPOINT, Some(&body)).await?;

        self.session().sign_in(pair.access, Some(pair.refresh), None).await;
        self.scheduler.start();
        Ok(())
    }

    /// Drop the local session. No server call is made; safe to repeat.
    pub async fn logout(&self) {
        self.end_session(SignOutReason::Logout).await;
    }

    pub async fn reset_password(&self, email: &str) -> Result<MessageAck, ApiError> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        self.http.request(Method::POST, RESET_PASSWORD_ENDPOINT, Some(&body)).await
    }

    // ---- submissions ----

    pub async fn list_submissions(&self) -> Result<Vec<Submission>, ApiError> {
        let page: Page<Submission> = self.authorized(move || self.http.get(SUBMISSIONS_ENDPOINT)).await?;
        Ok(page.into_items())
    }

    /// Submissions owned by the signed-in user.
    ///
    /// The backend has no per-user listing, so the full list is filtered
    /// here. When the account was not seen this run (session restored from
    /// storage) the username comes from the profile endpoint.
    pub async fn list_my_submissions(&self) -> Result<Vec<Submission>, ApiError> {
        let username = match self.session().current_user().await {
            Some(user) => user.username,
            None => self.get_profile().await?.username.ok_or(ApiError::NoData)?,
        };

        let mut submissions = self.list_submissions().await?;
        submissions.retain(|s| s.owner_username == username);
        Ok(submissions)
    }

    pub async fn get_submission(&self, id: DbId) -> Result<Submission, ApiError> {
        let endpoint = format!("{SUBMISSIONS_ENDPOINT}{id}/");
        let endpoint = endpoint.as_str();
        self.authorized(move || self.http.get(endpoint)).await
    }

    /// Upload a JPEG punch photo.
    pub async fn create_submission(
        &self,
        image: &[u8],
        description: &str,
        username: &str,
        email: &str,
    ) -> Result<SubmissionReceipt, ApiError> {
        let form = submission_form(image, description, username, email);
        let form = &form;
        self.authorized(move || self.http.upload(Method::POST, SUBMISSIONS_ENDPOINT, form))
            .await
    }

    /// Record a verdict. The request is checked locally before sending.
    pub async fn judge_submission(&self, id: DbId, request: &JudgeRequest) -> Result<Judgment, ApiError> {
        request.validate()?;

        let endpoint = format!("{SUBMISSIONS_ENDPOINT}{id}/judge/");
        let endpoint = endpoint.as_str();
        self.authorized(move || self.http.request(Method::POST, endpoint, Some(request)))
            .await
    }

    pub async fn report_submission(&self, id: DbId, request: &ReportRequest) -> Result<Report, ApiError> {
        let endpoint = format!("{SUBMISSIONS_ENDPOINT}{id}/report/");
        let endpoint = endpoint.as_str();
        self.authorized(move || self.http.request(Method::POST, endpoint, Some(request)))
            .await
    }

    // ---- profile ----

    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.authorized(move || self.http.get(PROFILE_ENDPOINT)).await
    }

    /// Replace bio and account names; the image part is only sent when given.
    pub async fn update_profile(
        &self,
        bio: &str,
        username: &str,
        email: &str,
        profile_image: Option<&[u8]>,
    ) -> Result<UserProfile, ApiError> {
        let form = profile_form(bio, username, email, profile_image);
        let form = &form;
        self.authorized(move || self.http.upload(Method::PUT, PROFILE_ENDPOINT, form))
            .await
    }

    // ---- rankings & notifications ----

    /// Ranked submissions; without `kind` the backend picks its default board.
    pub async fn list_rankings(&self, kind: Option<RankingKind>) -> Result<Vec<Ranking>, ApiError> {
        let endpoint = match kind {
            Some(kind) => format!("{RANKING_ENDPOINT}?type={kind}"),
            None => RANKING_ENDPOINT.to_string(),
        };
        let endpoint = endpoint.as_str();
        let page: Page<Ranking> = self.authorized(move || self.http.get(endpoint)).await?;
        Ok(page.into_items())
    }

    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let page: Page<Notification> = self.authorized(move || self.http.get(NOTIFICATIONS_ENDPOINT)).await?;
        Ok(page.into_items())
    }

    pub async fn mark_notification_read(&self, id: DbId) -> Result<StatusAck, ApiError> {
        let endpoint = format!("{NOTIFICATIONS_ENDPOINT}{id}/read/");
        let endpoint = endpoint.as_str();
        self.authorized(move || self.http.request::<StatusAck, ()>(Method::PATCH, endpoint, None))
            .await
    }

    // ---- admin ----

    pub async fn list_admin_submissions(&self) -> Result<Vec<Submission>, ApiError> {
        let page: Page<Submission> = self.authorized(move || self.http.get(ADMIN_SUBMISSIONS_ENDPOINT)).await?;
        Ok(page.into_items())
    }

    pub async fn list_admin_reports(&self) -> Result<Vec<Report>, ApiError> {
        let page: Page<Report> = self.authorized(move || self.http.get(ADMIN_REPORTS_ENDPOINT)).await?;
        Ok(page.into_items())
    }

    // ---- private helpers ----

    async fn establish(&self, auth: AuthResponse) -> User {
        let has_refresh = auth.refresh.is_some();
        self.session()
            .sign_in(auth.access, auth.refresh, Some(auth.user.clone()))
            .await;

        if has_refresh {
            self.scheduler.start();
        } else {
            self.scheduler.stop();
        }
        auth.user
    }

    async fn end_session(&self, reason: SignOutReason) {
        self.scheduler.stop();
        self.session().sign_out(reason).await;
    }

    /// Run `operation` with one refresh-and-retry on 401.
    ///
    /// The session ends when the retry is rejected as well, or when the
    /// refresh token itself is refused. A refresh that fails for any other
    /// reason leaves the session alone.
    async fn authorized<T, Op, Fut>(&self, operation: Op) -> Result<T, ApiError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let refreshed = AtomicBool::new(false);
        let refresh_refused = AtomicBool::new(false);

        let result = {
            let http = &self.http;
            let refreshed = &refreshed;
            let refresh_refused = &refresh_refused;
            retry_once_on_auth(operation, move || async move {
                let outcome = refresh::refresh_access_token(http).await;
                match &outcome {
                    Ok(()) => refreshed.store(true, Ordering::Relaxed),
                    Err(ApiError::AuthenticationFailed) => refresh_refused.store(true, Ordering::Relaxed),
                    Err(_) => {}
                }
                outcome
            })
            .await
        };

        let unrecoverable = refreshed.load(Ordering::Relaxed) || refresh_refused.load(Ordering::Relaxed);
        if matches!(result, Err(ApiError::AuthenticationFailed)) && unrecoverable {
            tracing::warn!("Session no longer accepted by the server, signing out");
            self.end_session(SignOutReason::Unauthorized).await;
        }
        result
    }
}
