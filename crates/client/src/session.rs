//! Injected session context.
//!
//! [`SessionContext`] is created once and shared via `Arc` with every
//! component that needs the tokens. Its mutation surface is deliberately
//! small: [`sign_in`](SessionContext::sign_in),
//! [`replace_tokens`](SessionContext::replace_tokens) and
//! [`sign_out`](SessionContext::sign_out). Each transition is persisted to
//! the [`TokenStore`] and announced as a [`SessionEvent`].

use std::sync::Arc;

use punch_core::models::User;
use punch_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::jwt;
use crate::token_store::{StoredTokens, TokenStore};

/// Buffer capacity for the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Read-only view of an active session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// From the access token's `exp` claim, when it has one.
    pub expires_at: Option<Timestamp>,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutReason {
    /// The user asked to sign out.
    Logout,
    /// The server kept answering 401 after a refresh.
    Unauthorized,
    /// A refresh was due but no refresh token was available.
    RefreshUnavailable,
}

/// Session state change, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn { username: Option<String> },
    TokenRefreshed { expires_at: Option<Timestamp> },
    SignedOut { reason: SignOutReason },
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
}

impl SessionState {
    fn stored(&self) -> StoredTokens {
        StoredTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// The single logical session of this client process.
pub struct SessionContext {
    state: RwLock<SessionState>,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    /// A signed-out session backed by `store`. Nothing is read yet.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_state(store, SessionState::default())
    }

    /// Build a session from whatever `store` persisted on a previous run.
    ///
    /// The session is authenticated iff an access token was found; its
    /// expiry is not checked. A store that cannot be read yields a
    /// signed-out session.
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let tokens = match store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load stored tokens, starting signed out");
                StoredTokens::default()
            }
        };

        tracing::debug!(authenticated = tokens.is_authenticated(), "Session restored");

        let state = SessionState {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user: None,
        };
        Self::with_state(store, state)
    }

    fn with_state(store: Arc<dyn TokenStore>, state: SessionState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(state),
            store,
            events,
        }
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.access_token.is_some()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    /// Account snapshot from the last login/register, if this process saw one.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// The active session, or `None` when signed out.
    pub async fn session(&self) -> Option<Session> {
        let state = self.state.read().await;
        let access_token = state.access_token.clone()?;
        let expires_at = jwt::expires_at(&access_token);
        Some(Session {
            access_token,
            refresh_token: state.refresh_token.clone(),
            expires_at,
        })
    }

    /// Enter the signed-in state with a fresh token pair.
    pub async fn sign_in(&self, access_token: String, refresh_token: Option<String>, user: Option<User>) {
        let username = user.as_ref().map(|u| u.username.clone());
        let tokens = {
            let mut state = self.state.write().await;
            state.access_token = Some(access_token);
            state.refresh_token = refresh_token;
            state.user = user;
            state.stored()
        };

        self.persist(&tokens);
        tracing::info!(username = username.as_deref().unwrap_or("-"), "Signed in");
        self.publish(SessionEvent::SignedIn { username });
    }

    /// Overwrite the access token after a refresh. The refresh token is only
    /// replaced when the server rotated it.
    ///
    /// Returns `false` and changes nothing if the session was signed out in
    /// the meantime, so a late refresh cannot revive it.
    pub async fn replace_tokens(&self, access_token: String, refresh_token: Option<String>) -> bool {
        let tokens = {
            let mut state = self.state.write().await;
            if state.access_token.is_none() {
                return false;
            }
            state.access_token = Some(access_token);
            if let Some(refresh) = refresh_token {
                state.refresh_token = Some(refresh);
            }
            state.stored()
        };

        self.persist(&tokens);
        let expires_at = tokens.access_token.as_deref().and_then(jwt::expires_at);
        tracing::debug!(?expires_at, "Access token refreshed");
        self.publish(SessionEvent::TokenRefreshed { expires_at });
        true
    }

    /// Clear tokens from memory and storage.
    ///
    /// Idempotent: the end state is always signed out with an empty store.
    /// The event is only published when a session actually ended.
    pub async fn sign_out(&self, reason: SignOutReason) -> bool {
        let was_signed_in = {
            let mut state = self.state.write().await;
            let was_signed_in = state.access_token.is_some();
            *state = SessionState::default();
            was_signed_in
        };

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored tokens");
        }

        if was_signed_in {
            tracing::info!(?reason, "Signed out");
            self.publish(SessionEvent::SignedOut { reason });
        }
        was_signed_in
    }

    fn persist(&self, tokens: &StoredTokens) {
        if let Err(e) = self.store.save(tokens) {
            tracing::warn!(error = %e, "Failed to persist tokens");
        }
    }

    fn publish(&self, event: SessionEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.events.send(event);
    }
}
