//! # ip21-client
//!
//! Async client for AspenTech IP21 process-data historians reached through
//! the SQLplus web server, with Windows-domain (NTLM) authentication.
//!
//! This is the primary public API surface for the ip21-historian-client
//! project. It exposes three operations over the vendor's ProcessData
//! interface:
//!
//! - **Ad-hoc SQL** ([`Ip21Client::query`]): run SQLplus statements against
//!   the historian, over REST or the legacy SOAP web service.
//! - **Tag history** ([`Ip21Client::history`]): read archived samples for
//!   one or more tags over a time window, with vendor retrieval-type and
//!   format codes modeled as closed enums.
//! - **KPI lookup** ([`Ip21Client::kpi`]): fetch the KPI record for a tag.
//!
//! Successful responses parse into a JSON payload; non-200 application
//! responses come back as an [`ErrorResult`] value rather than an error, so
//! only transport, authentication, and parse faults surface as `Err`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ip21_client::{Config, Credentials, HistoryOptions, Ip21Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Ip21Client::new(
//!         Config::new()
//!             .credentials(Credentials::new("john.doe", "CONTOSO", "secret"))
//!             .sqlplus_address("sqlplus.plant.local")
//!             .ip21_address("historian.plant.local"),
//!     )?;
//!
//!     let rows = client
//!         .query("SELECT Name, IP_DESCRIPTION FROM IP_AnalogDef")
//!         .await?;
//!
//!     let trend = client
//!         .history(
//!             ["FC101.PV", "TC102.PV"],
//!             1_700_000_000_000,
//!             1_700_003_600_000,
//!             HistoryOptions::new().limit(1000),
//!         )
//!         .await?;
//!
//!     println!("{rows:?} {trend:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
mod http;
pub mod response;
mod transport;

// Re-export commonly used types
pub use client::Ip21Client;
pub use config::{Config, TransportMode};
pub use error::Error;
pub use ip21_auth::Credentials;
pub use ip21_protocol::{
    HistoryFormat, HistoryOptions, RetrievalType, TagSelection,
};
pub use response::{ErrorResult, ResponseResult};
