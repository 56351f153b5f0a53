//! # ip21-testing
//!
//! Test infrastructure for IP21 historian client development: a mock
//! SQLplus HTTP server with scripted responses and request recording, plus
//! canned wire fixtures. Dev-only; never published.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod mock_server;

pub use mock_server::{MockHistorianServer, MockResponse, RecordedRequest};
