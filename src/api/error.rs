// API error types

use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Errors that can occur when talking to the finance API
#[derive(Error, Debug)]
pub enum ApiError {
    /// No bearer token is stored for an authenticated call
    #[error("Authentication token is missing. Please log in.")]
    MissingToken,

    /// The server rejected the token (401/403); the session has been cleared
    #[error("Authentication failed or expired. Please log in again.")]
    AuthFailed,

    /// Non-success status with the backend's message (or a fallback)
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token file could not be read or written
    #[error("Token storage error: {0}")]
    Token(#[from] io::Error),
}

impl ApiError {
    /// Whether this error means the user has to log in again
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailed | Self::MissingToken)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
