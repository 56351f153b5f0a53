//! # ip21-auth
//!
//! Windows-domain (NTLM) authentication for IP21 historian connections,
//! isolated from transport logic for better modularity and testing.
//!
//! The historian's SQLplus web server sits behind IIS with Windows
//! authentication enabled, so every HTTP request may be challenged with
//! `401` / `WWW-Authenticate: NTLM`. This crate owns the credential types
//! and the three-leg NTLM handshake; the HTTP layer in `ip21-client` decides
//! when to run it.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod credentials;
pub mod error;
pub mod ntlm;

pub use credentials::Credentials;
pub use error::AuthError;
pub use ntlm::NtlmHandshake;
