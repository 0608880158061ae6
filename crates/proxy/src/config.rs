/// Proxy configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Backend origin, without the `/api` suffix and without a trailing slash.
    pub upstream_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds, covering the upstream round-trip.
    pub request_timeout_secs: u64,
    /// Largest request body accepted on upload routes, in bytes.
    pub max_upload_bytes: usize,
}

pub const DEFAULT_UPSTREAM_URL: &str = "https://world-fastest-punch.onrender.com";

/// Room for a 2 MB photo plus the multipart framing around it.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl ProxyConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                     |
    /// |------------------------|---------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                   |
    /// | `PORT`                 | `3000`                                      |
    /// | `DJANGO_API_URL`       | `https://world-fastest-punch.onrender.com`  |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`                     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                        |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let upstream_url = std::env::var("DJANGO_API_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            host,
            port,
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
        }
    }

    /// Local defaults pointed at `upstream_url`.
    pub fn for_upstream(upstream_url: impl Into<String>) -> Self {
        let upstream_url: String = upstream_url.into();
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_trailing_slash_is_trimmed() {
        let config = ProxyConfig::for_upstream("http://backend:8000/");
        assert_eq!(config.upstream_url, "http://backend:8000");
    }

    #[test]
    fn upload_limit_leaves_room_for_a_2mb_photo() {
        let config = ProxyConfig::for_upstream("http://backend:8000");
        assert!(config.max_upload_bytes > 2 * 1024 * 1024 + 64 * 1024);
    }
}
