//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while building or decoding ProcessData payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A history request was built with no tags.
    #[error("history request requires at least one tag")]
    EmptyTagSet,

    /// An expected element was missing from a response document.
    #[error("missing element in response: {0}")]
    MissingElement(String),

    /// A numeric code does not map to a known retrieval type.
    #[error("unknown retrieval type code: {0}")]
    UnknownRetrievalType(u8),

    /// A numeric code does not map to a known history format.
    #[error("unknown history format code: {0}")]
    UnknownHistoryFormat(u8),
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
