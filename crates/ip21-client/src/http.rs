//! NTLM-authenticated HTTP POST plumbing.
//!
//! Requests go out unauthenticated first; only when the server answers
//! `401` offering NTLM does the three-leg handshake run, with every leg
//! carrying the original body so the final authenticated request needs no
//! replay bookkeeping.

use std::time::Duration;

use ip21_auth::{Credentials, NtlmHandshake, ntlm};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};

use crate::error::{Error, Result};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub(crate) struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status, when one exists.
    pub reason: Option<&'static str>,
    /// Raw response body.
    pub body: String,
}

/// HTTP sender bound to one set of credentials.
#[derive(Debug)]
pub(crate) struct NtlmHttp {
    client: reqwest::Client,
    credentials: Credentials,
}

impl NtlmHttp {
    /// Build a sender.
    ///
    /// NTLM authenticates the TCP connection rather than the request, so the
    /// pool is pinned to HTTP/1 with a single idle connection per host; the
    /// handshake legs and the authenticated request then reuse one socket.
    pub(crate) fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .http1_only()
            .pool_max_idle_per_host(1)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// POST `body` to `url`, running the NTLM handshake if challenged.
    pub(crate) async fn post(
        &self,
        url: &str,
        body: &str,
        content_type: &'static str,
        soap_action: Option<&'static str>,
    ) -> Result<HttpReply> {
        let first = self.send(url, body, content_type, soap_action, None).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Self::into_reply(first).await;
        }
        let offered = header_string(&first, WWW_AUTHENTICATE);
        if !ntlm::offers_ntlm(&offered) {
            // The 401 stands on its own; surface it as an application error.
            return Self::into_reply(first).await;
        }
        first.bytes().await?; // drain so the connection returns to the pool

        let target = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        let mut handshake = NtlmHandshake::new(&self.credentials, target)?;

        let negotiate = handshake.negotiate()?;
        tracing::debug!(url, "sending NTLM negotiate");
        let second = self
            .send(url, body, content_type, soap_action, Some(&negotiate))
            .await?;
        if second.status() != StatusCode::UNAUTHORIZED {
            return Self::into_reply(second).await;
        }

        let challenge_header = header_string(&second, WWW_AUTHENTICATE);
        let Some(challenge) = ntlm::challenge_from_header(&challenge_header) else {
            return Err(Error::Auth(ip21_auth::AuthError::Rejected {
                attempts: handshake.steps(),
            }));
        };
        let authenticate = handshake.respond(challenge)?;
        second.bytes().await?;

        tracing::debug!(url, "sending NTLM authenticate");
        let third = self
            .send(url, body, content_type, soap_action, Some(&authenticate))
            .await?;
        Self::into_reply(third).await
    }

    async fn send(
        &self,
        url: &str,
        body: &str,
        content_type: &'static str,
        soap_action: Option<&'static str>,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body.to_string());
        if let Some(action) = soap_action {
            request = request.header("SOAPAction", format!("\"{action}\""));
        }
        if let Some(auth) = authorization {
            request = request.header(AUTHORIZATION, auth);
        }
        Ok(request.send().await?)
    }

    async fn into_reply(response: reqwest::Response) -> Result<HttpReply> {
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpReply {
            status: status.as_u16(),
            reason: status.canonical_reason(),
            body,
        })
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
