//! KPI lookup encoding for the ProcessData REST `KPI` endpoint.
//!
//! Unlike the SQL and History operations, the KPI endpoint takes a plain
//! URL-encoded form body rather than XML.

use url::form_urlencoded;

/// A KPI lookup for a single tag.
#[derive(Debug, Clone)]
pub struct KpiRequest {
    tag: String,
}

impl KpiRequest {
    /// Create a KPI lookup.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The tag being looked up.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Encode the form body for the given IP21 data-source host.
    #[must_use]
    pub fn encode(&self, ip21_address: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("dataSource", ip21_address)
            .append_pair("tag", &self.tag)
            .append_pair("allQuotes", "1")
            .finish()
    }
}
