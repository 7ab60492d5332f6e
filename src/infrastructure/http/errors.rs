use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the HTTP adapters (paper search and Ollama)
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Unauthorized - check the configured API key")]
    Unauthorized,

    /// Permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource or model not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimited,

    /// Server side failure (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    Server(StatusCode, String),

    /// Connection level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other status
    #[error("Unexpected response ({0}): {1}")]
    Unexpected(StatusCode, String),
}

impl ApiError {
    /// Classify a non-success response
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            401 => Self::Unauthorized,
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimited,
            500..=599 => Self::Server(status, body),
            _ => Self::Unexpected(status, body),
        }
    }

    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Server(_, _) | Self::Timeout | Self::Network(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::Unauthorized | Self::Forbidden(_) | Self::NotFound(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
