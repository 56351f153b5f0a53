//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during NTLM authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The server's challenge header could not be decoded.
    #[error("malformed NTLM challenge: {0}")]
    MalformedChallenge(String),

    /// The server denied the NTLM handshake.
    #[error("authentication rejected by server after {attempts} handshake step(s)")]
    Rejected {
        /// Handshake steps completed before the rejection.
        attempts: u32,
    },

    /// The server offered no authentication scheme the client supports.
    #[error("server does not offer NTLM authentication (offered: {offered})")]
    UnsupportedScheme {
        /// The `WWW-Authenticate` value the server sent.
        offered: String,
    },

    /// SSPI error while producing a handshake token.
    #[error("SSPI error: {0}")]
    Sspi(String),
}

impl From<sspi::Error> for AuthError {
    fn from(err: sspi::Error) -> Self {
        Self::Sspi(err.to_string())
    }
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
