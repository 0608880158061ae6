//! Bounded refresh-and-retry for requests that hit a 401.

use std::future::Future;

use crate::error::ApiError;

/// Run `operation`; if it fails with [`ApiError::AuthenticationFailed`],
/// run `refresh` once and, only if that succeeds, run `operation` exactly
/// once more.
///
/// `operation` is therefore called at most twice. A 401 on the second
/// attempt is returned as is. When `refresh` fails the caller sees the
/// original [`ApiError::AuthenticationFailed`], not the refresh error.
/// There is no backoff: the refresh already cost a round-trip.
pub async fn retry_once_on_auth<T, Op, OpFut, Refresh, RefreshFut>(
    mut operation: Op,
    refresh: Refresh,
) -> Result<T, ApiError>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, ApiError>>,
    Refresh: FnOnce() -> RefreshFut,
    RefreshFut: Future<Output = Result<(), ApiError>>,
{
    match operation().await {
        Err(ApiError::AuthenticationFailed) => {}
        other => return other,
    }

    tracing::info!("Access token rejected, refreshing before retry");

    if let Err(e) = refresh().await {
        tracing::warn!(error = %e, "Token refresh failed, not retrying");
        return Err(ApiError::AuthenticationFailed);
    }

    operation().await
}
