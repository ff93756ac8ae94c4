//! Error types for the administration API client and poller

use thiserror::Error;

/// Failures from the instance administration API
///
/// `Status` keeps the raw response body; it is for server-side logs
/// only and must never be echoed to the marketplace.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream answered 409: the instance already exists
    #[error("instance already exists")]
    AlreadyExists,

    #[error("access token acquisition failed: {0}")]
    Token(#[from] TokenError),

    #[error("API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response with the body the upstream sent
    #[error("API request failed: {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures acquiring an access token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned status {0}")]
    Status(u16),

    #[error("failed to decode token response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures waiting for an instance to become usable
#[derive(Debug, Error)]
pub enum PollError {
    /// Attempt budget exhausted while the instance was still not ready
    #[error("instance not ready after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// Instance reports runnable but exposes no address
    #[error("instance is runnable but has no address")]
    MissingAddress,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PollError {
    /// True when the poll ran out of attempts rather than hitting a hard failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }
}
