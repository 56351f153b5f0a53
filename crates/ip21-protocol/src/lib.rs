//! # ip21-protocol
//!
//! Payload construction and decoding for the AspenTech IP21 ProcessData
//! interface, isolated from transport and authentication concerns.
//!
//! The wire formats here are externally owned: the XML envelopes, form
//! bodies, attribute names, and numeric codes all mirror what the vendor's
//! `AtProcessDataREST.dll` and SQLplus web service expect. This crate does
//! no I/O; it turns typed requests into request bodies and pulls results out
//! of the SOAP response documents.
//!
//! ## Operations
//!
//! | Operation | Body | Module |
//! |-----------|------|--------|
//! | Ad-hoc SQL | `<SQL ...><![CDATA[...]]></SQL>` | [`sql`] |
//! | Tag history | `<Q f="d" allQuotes="1"><Tag>...</Tag></Q>` | [`history`] |
//! | KPI lookup | URL-encoded form | [`kpi`] |
//! | Legacy SQL (SOAP) | SOAP 1.1 `ExecuteSQL` envelope | [`soap`] |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod endpoint;
pub mod error;
pub mod history;
pub mod kpi;
pub mod soap;
pub mod sql;
pub mod xml;

pub use error::ProtocolError;
pub use history::{HistoryFormat, HistoryOptions, HistoryRequest, RetrievalType, TagSelection};
pub use kpi::KpiRequest;
pub use sql::SqlEnvelope;
