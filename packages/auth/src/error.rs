// ABOUTME: Error types for OAuth credential management
// ABOUTME: Distinguishes provider rejections, CSRF failures, and missing/expired authorization

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Upstream rejected the request; carries the upstream status code.
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("State mismatch: CSRF protection failed")]
    StateMismatch,

    /// Callback request is missing or carries unusable parameters.
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    #[error("No credentials found: {0}")]
    CredentialsNotFound(String),

    /// Refresh was refused with unauthorized; the user must reconnect.
    #[error("Authorization expired, please reconnect")]
    AuthorizationExpired,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] hubgate_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Provider rejection from an upstream status and response body.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }
}
