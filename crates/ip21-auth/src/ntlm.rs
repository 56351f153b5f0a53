//! NTLM-over-HTTP handshake.
//!
//! IIS-hosted SQLplus endpoints authenticate requests with the connection-
//! oriented NTLM scheme: the client sends a type-1 (negotiate) token in an
//! `Authorization: NTLM <base64>` header, the server answers `401` with a
//! type-2 (challenge) token in `WWW-Authenticate`, and the client replies
//! with a type-3 (authenticate) token on the same TCP connection. Token
//! generation is delegated to the `sspi` crate; this module only drives the
//! state machine and the header encoding around it.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sspi::{
    AuthIdentityBuffers, BufferType, ClientRequestFlags, DataRepresentation, Ntlm, SecurityBuffer,
    SecurityStatus, Sspi, SspiImpl, Username,
};

use crate::credentials::Credentials;
use crate::error::{AuthError, Result};

/// HTTP authentication scheme token.
pub const SCHEME: &str = "NTLM";

/// Extract the base64 challenge from a `WWW-Authenticate` header value.
///
/// Servers list offered schemes either bare (`NTLM`) or with a token
/// (`NTLM TlRMTVNT...`); only the latter carries a challenge. Returns `None`
/// when the header names a different scheme.
#[must_use]
pub fn challenge_from_header(header: &str) -> Option<&str> {
    let rest = header.trim().strip_prefix(SCHEME)?;
    let token = rest.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Check whether a `WWW-Authenticate` header offers NTLM at all.
#[must_use]
pub fn offers_ntlm(header: &str) -> bool {
    header
        .split(',')
        .any(|scheme| scheme.trim().eq_ignore_ascii_case(SCHEME) || scheme.trim().starts_with(SCHEME))
}

/// Driver for one NTLM handshake.
///
/// A handshake is single-use: [`negotiate`](Self::negotiate) produces the
/// type-1 header value, [`respond`](Self::respond) consumes the server's
/// challenge and produces the type-3 header value. Each HTTP request that
/// triggers a `401` needs a fresh handshake.
pub struct NtlmHandshake {
    ntlm: Ntlm,
    credentials_handle: Option<AuthIdentityBuffers>,
    target: String,
    steps: u32,
}

impl NtlmHandshake {
    /// Begin a handshake for `credentials` against the named target host.
    pub fn new(credentials: &Credentials, target: impl Into<String>) -> Result<Self> {
        let username = Username::parse(&credentials.qualified_account())
            .map_err(|err| AuthError::InvalidCredentials(err.to_string()))?;
        let identity = sspi::AuthIdentity {
            username,
            password: credentials.password().to_string().into(),
        };

        let mut ntlm = Ntlm::new();
        let acq = ntlm
            .acquire_credentials_handle()
            .with_credential_use(sspi::CredentialUse::Outbound)
            .with_auth_data(&identity)
            .execute(&mut ntlm)?;

        Ok(Self {
            ntlm,
            credentials_handle: acq.credentials_handle,
            target: target.into(),
            steps: 0,
        })
    }

    /// Produce the type-1 (negotiate) `Authorization` header value.
    pub fn negotiate(&mut self) -> Result<String> {
        let token = self.step(&[])?;
        Ok(format!("{SCHEME} {}", BASE64.encode(token)))
    }

    /// Consume the server's type-2 challenge and produce the type-3
    /// (authenticate) `Authorization` header value.
    pub fn respond(&mut self, challenge_b64: &str) -> Result<String> {
        let challenge = BASE64
            .decode(challenge_b64.trim())
            .map_err(|err| AuthError::MalformedChallenge(err.to_string()))?;
        let token = self.step(&challenge)?;
        Ok(format!("{SCHEME} {}", BASE64.encode(token)))
    }

    /// Handshake steps completed so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    fn step(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut input_buffers = vec![SecurityBuffer::new(input.to_vec(), BufferType::Token)];
        let mut output_buffers = vec![SecurityBuffer::new(Vec::new(), BufferType::Token)];

        let mut builder = self
            .ntlm
            .initialize_security_context()
            .with_credentials_handle(&mut self.credentials_handle)
            .with_context_requirements(
                ClientRequestFlags::CONFIDENTIALITY | ClientRequestFlags::ALLOCATE_MEMORY,
            )
            .with_target_data_representation(DataRepresentation::Native)
            .with_target_name(&self.target)
            .with_input(&mut input_buffers)
            .with_output(&mut output_buffers);

        let result = self
            .ntlm
            .initialize_security_context_impl(&mut builder)?
            .resolve_to_result()?;

        if matches!(
            result.status,
            SecurityStatus::CompleteNeeded | SecurityStatus::CompleteAndContinue
        ) {
            self.ntlm.complete_auth_token(&mut output_buffers)?;
        }

        self.steps += 1;
        tracing::trace!(step = self.steps, status = ?result.status, "NTLM handshake step");

        let token = output_buffers
            .into_iter()
            .find(|buffer| buffer.buffer_type.buffer_type == BufferType::Token)
            .map(|buffer| buffer.buffer)
            .unwrap_or_default();
        if token.is_empty() {
            return Err(AuthError::Sspi("empty NTLM token produced".into()));
        }
        Ok(token)
    }
}

impl std::fmt::Debug for NtlmHandshake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtlmHandshake")
            .field("target", &self.target)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
