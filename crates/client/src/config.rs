use std::path::PathBuf;
use std::time::Duration;

/// Production backend used when `PUNCH_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://world-fastest-punch.onrender.com";
/// Token file used when `PUNCH_TOKEN_FILE` is unset.
pub const DEFAULT_TOKEN_FILE: &str = ".punch/tokens.json";
/// Refresh cadence when the access token carries no readable `exp` claim.
const DEFAULT_REFRESH_FALLBACK_SECS: u64 = 25 * 60;
/// How long before `exp` the scheduler renews the access token.
const DEFAULT_REFRESH_MARGIN_SECS: u64 = 60;
/// Delay before trying again after a failed scheduled refresh.
const DEFAULT_REFRESH_RETRY_SECS: u64 = 120;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash, e.g. `https://host`.
    pub api_url: String,
    /// Where the access/refresh tokens are persisted.
    pub token_file: PathBuf,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
    pub refresh: RefreshSettings,
}

/// Timing knobs for the background token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    /// Renew this long before the access token expires.
    pub margin: Duration,
    /// Interval used when the token has no decodable expiry.
    pub fallback_interval: Duration,
    /// Delay after a failed refresh before the next attempt.
    pub retry_interval: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            margin: Duration::from_secs(DEFAULT_REFRESH_MARGIN_SECS),
            fallback_interval: Duration::from_secs(DEFAULT_REFRESH_FALLBACK_SECS),
            retry_interval: Duration::from_secs(DEFAULT_REFRESH_RETRY_SECS),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with every other field defaulted.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.into()),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            request_timeout: None,
            refresh: RefreshSettings::default(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                                    |
    /// |--------------------------------|--------------------------------------------|
    /// | `PUNCH_API_URL`                | `https://world-fastest-punch.onrender.com` |
    /// | `PUNCH_TOKEN_FILE`             | `.punch/tokens.json`                       |
    /// | `PUNCH_REQUEST_TIMEOUT_SECS`   | unset (no timeout)                         |
    /// | `PUNCH_REFRESH_MARGIN_SECS`    | `60`                                       |
    /// | `PUNCH_REFRESH_FALLBACK_SECS`  | `1500`                                     |
    /// | `PUNCH_REFRESH_RETRY_SECS`     | `120`                                      |
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("PUNCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let token_file = std::env::var("PUNCH_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE));

        let request_timeout = env_secs("PUNCH_REQUEST_TIMEOUT_SECS").map(Duration::from_secs);

        let refresh = RefreshSettings {
            margin: Duration::from_secs(
                env_secs("PUNCH_REFRESH_MARGIN_SECS").unwrap_or(DEFAULT_REFRESH_MARGIN_SECS),
            ),
            fallback_interval: Duration::from_secs(
                env_secs("PUNCH_REFRESH_FALLBACK_SECS").unwrap_or(DEFAULT_REFRESH_FALLBACK_SECS),
            ),
            retry_interval: Duration::from_secs(
                env_secs("PUNCH_REFRESH_RETRY_SECS").unwrap_or(DEFAULT_REFRESH_RETRY_SECS),
            ),
        };

        Self {
            api_url: normalize_base_url(api_url),
            token_file,
            request_timeout,
            refresh,
        }
    }
}

fn env_secs(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Endpoints start with `/`, so the base must not end with one.
fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
