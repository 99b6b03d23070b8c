//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client-side abort after the configured request timeout elapsed
    #[error("request exceeded configured timeout, check connectivity")]
    Timeout,

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// Non-2xx status or `success: false` envelope, carries the server message
    #[error("server error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Response body did not match the expected envelope
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The poller supports exactly one active subscription at a time
    #[error("a reservation subscription is already active")]
    AlreadySubscribed,
}

impl ClientError {
    /// Whether this is a not-found backend response. The read operations
    /// translate these to `Ok(None)` rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
