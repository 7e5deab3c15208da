use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlueskyError>;

/// Failures raised by the remote service. Every variant carries plain text so
/// the follower can classify outcomes from the rendered message alone.
#[derive(Debug, Clone, Error)]
pub enum BlueskyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BlueskyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BlueskyError::Parse(err.to_string())
        } else {
            BlueskyError::Network(err.to_string())
        }
    }
}
