//! Client error types.
//!
//! Only faults surface here: network failures, handshake failures, payload
//! construction errors, and unparseable 200-responses. A non-200 application
//! response is not an error; it is returned as data in
//! [`ResponseResult::Error`](crate::response::ResponseResult::Error).

use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failure (connection refused, DNS, timeout).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// NTLM authentication failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] ip21_auth::AuthError),

    /// Payload construction or decoding error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ip21_protocol::ProtocolError),

    /// A 200 response carried a body that is not valid JSON.
    #[error("malformed JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
