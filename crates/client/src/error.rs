use punch_core::CoreError;

/// Errors surfaced by every client call.
///
/// Only [`ApiError::AuthenticationFailed`] has recovery behaviour (one
/// refresh-and-retry); everything else propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `base_url + endpoint` did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A 2xx response arrived with an empty body where a payload was expected.
    #[error("Response contained no data")]
    NoData,

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decoding(#[from] serde_json::Error),

    /// Transport failure, or a non-2xx status other than 401. Carries the
    /// upstream `error` message verbatim when one was provided.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered 401 Unauthorized.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The request was rejected locally before being sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

impl ApiError {
    /// Short message suitable for an alert. Upstream messages pass through.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "The request address is invalid.".into(),
            Self::NoData => "The server returned no data.".into(),
            Self::Decoding(_) => "The server response could not be read.".into(),
            Self::Network(message) => format!("Network error: {message}"),
            Self::AuthenticationFailed => "Your session has expired. Please sign in again.".into(),
            Self::Validation(CoreError::Validation(message)) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Failures reading or writing persisted tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store contents are malformed: {0}")]
    Format(#[from] serde_json::Error),
}
