//! Authenticated client for the World's Fastest Punch REST backend.
//!
//! The pieces stack bottom-up:
//!
//! - [`token_store`] persists the access/refresh token pair.
//! - [`session`] owns the in-memory session and broadcasts
//!   [`SessionEvent`]s whenever it changes.
//! - [`http`] attaches the bearer token, encodes bodies, and maps 401 to
//!   [`ApiError::AuthenticationFailed`].
//! - [`retry`] refreshes once and replays a request that hit a 401.
//! - [`refresh`] renews the access token ahead of its `exp` claim.
//! - [`api`] is the typed surface UI code calls.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod jwt;
pub mod multipart;
pub mod refresh;
pub mod retry;
pub mod session;
pub mod token_store;

pub use api::PunchApi;
pub use config::ClientConfig;
pub use error::{ApiError, TokenStoreError};
pub use session::{Session, SessionContext, SessionEvent, SignOutReason};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
