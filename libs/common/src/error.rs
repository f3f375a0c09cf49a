//! Custom error types for backend API calls
//!
//! Every failure mode of the gateway wrapper is normalized into [`ApiError`].
//! Callers deliberately cannot distinguish a backend rejection from a network
//! failure beyond the message: both mean "do not trust this request".

use thiserror::Error;

/// Custom error type for backend API operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-success status code
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The request never produced a response
    #[error("backend request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode backend response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Whether the failure means the presented token is not trusted.
    ///
    /// The backend answers 401 for expired/invalid tokens and 403 for
    /// unconfirmed accounts; both drop the session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Backend {
                status: 401 | 403,
                ..
            }
        )
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
