//! Response parsing shared by all operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpReply;

/// A non-200 application response, represented as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// HTTP status code returned by the service.
    pub status: u16,
    /// Human-readable message, prefixed with `Error on IP21:`.
    pub message: String,
}

/// Outcome of one historian operation.
///
/// HTTP 200 parses into [`ResponseResult::Payload`]; any other status wraps
/// into [`ResponseResult::Error`] instead of raising, so callers can treat
/// application-level failures as ordinary values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseResult {
    /// Parsed JSON payload from a successful response.
    Payload(Value),
    /// Structured error record from a non-200 response.
    Error(ErrorResult),
}

impl ResponseResult {
    /// Whether this is a successful payload.
    #[must_use]
    pub fn is_payload(&self) -> bool {
        matches!(self, Self::Payload(_))
    }

    /// The payload, if this is a success.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Payload(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// The error record, if this is a failure.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            Self::Payload(_) => None,
            Self::Error(err) => Some(err),
        }
    }
}

/// Convert a raw HTTP reply into a [`ResponseResult`].
///
/// Malformed JSON in a 200 response is a fault and propagates; a non-200
/// body is never parsed, only quoted in the error message.
pub(crate) fn parse_reply(reply: &HttpReply) -> Result<ResponseResult, serde_json::Error> {
    if reply.status == 200 {
        return Ok(ResponseResult::Payload(serde_json::from_str(&reply.body)?));
    }
    let reason = reply
        .reason
        .filter(|r| !r.is_empty())
        .unwrap_or(reply.body.as_str());
    Ok(ResponseResult::Error(ErrorResult {
        status: reply.status,
        message: format!("Error on IP21: {reason}"),
    }))
}
