//! SQL envelope encoding for the ProcessData REST `SQL` endpoint.
//!
//! The service expects a single `<SQL>` element whose `c` attribute carries
//! an ODBC-style connection string pointing at the IP21 database, `m` the row
//! limit, `to` the server-side timeout in seconds, and `s` a flag telling the
//! service whether the statement is a pure read (`SELECT`) or a mutation.
//! The statement itself travels as CDATA.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::xml::{escape_attr, write_cdata};

/// Server-side statement timeout embedded in the envelope, in seconds.
pub const SQL_TIMEOUT_SECS: u32 = 30;

/// Default row limit applied when the caller does not supply one.
pub const DEFAULT_ROW_LIMIT: u32 = 100;

#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static SELECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^select").unwrap());

/// Classify a statement as a read (`SELECT ...`) versus a mutation.
///
/// The service uses this to decide whether the statement may be executed
/// against a read-only replica; the match is case-insensitive and anchored
/// at the first byte, mirroring the vendor interface's expectation.
#[must_use]
pub fn is_select(sql: &str) -> bool {
    SELECT_RE.is_match(sql)
}

/// Build the fixed ODBC connection string for a given IP21 host.
///
/// Everything except the host is a vendor-defined literal; the `TIMEOUT=10`
/// inside it is the driver connect timeout, distinct from the statement
/// timeout carried in the envelope's `to` attribute.
#[must_use]
pub fn connection_string(ip21_address: &str) -> String {
    format!(
        "DRIVER={{AspenTech SQLplus}};HOST={ip21_address};PORT=10014;\
         CHARISNULL=Y;CHARINT=N;CHARFLOAT=N;CHARTIME=N;\
         CONVERTERRORS=N;ROWID=Y;TIMEOUT=10"
    )
}

/// An ad-hoc SQL request against the historian.
#[derive(Debug, Clone)]
pub struct SqlEnvelope {
    sql: String,
    limit: u32,
}

impl SqlEnvelope {
    /// Create an envelope with an explicit row limit.
    #[must_use]
    pub fn new(sql: impl Into<String>, limit: u32) -> Self {
        Self {
            sql: sql.into(),
            limit,
        }
    }

    /// Create an envelope with the default row limit.
    #[must_use]
    pub fn with_default_limit(sql: impl Into<String>) -> Self {
        Self::new(sql, DEFAULT_ROW_LIMIT)
    }

    /// Get the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the row limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Encode the envelope for the given IP21 data-source host.
    #[must_use]
    pub fn encode(&self, ip21_address: &str) -> String {
        let conn = connection_string(ip21_address);
        let select_flag = u8::from(is_select(&self.sql));
        let mut out = String::with_capacity(conn.len() + self.sql.len() + 64);
        out.push_str("<SQL c=\"");
        out.push_str(&escape_attr(&conn));
        out.push_str("\" m=\"");
        out.push_str(&self.limit.to_string());
        out.push_str("\" to=\"");
        out.push_str(&SQL_TIMEOUT_SECS.to_string());
        out.push_str("\" s=\"");
        out.push_str(&select_flag.to_string());
        out.push_str("\">");
        write_cdata(&mut out, &self.sql);
        out.push_str("</SQL>");
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn select_detection_case_insensitive() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("select name from IP_AnalogDef"));
        assert!(is_select("SeLeCt *"));
        assert!(!is_select("UPDATE IP_AnalogDef SET IP_VALUE = 0"));
        assert!(!is_select("  SELECT 1")); // anchored at the first byte
        assert!(!is_select("DELETE FROM t"));
    }

    #[test]
    fn encode_select_sets_s_attribute() {
        let body = SqlEnvelope::new("SELECT 1", 50).encode("10.0.0.5");
        assert!(body.contains(r#" s="1""#));
        assert!(body.contains(r#" m="50""#));
        assert!(body.contains(r#" to="30""#));
        assert!(body.contains("<![CDATA[SELECT 1]]>"));
    }

    #[test]
    fn encode_mutation_clears_s_attribute() {
        let body = SqlEnvelope::new("UPDATE t SET x = 1", 100).encode("10.0.0.5");
        assert!(body.contains(r#" s="0""#));
    }

    #[test]
    fn encode_embeds_ip21_host() {
        let body = SqlEnvelope::new("SELECT 1", 100).encode("historian.plant.local");
        assert!(body.contains("HOST=historian.plant.local;PORT=10014"));
    }

    #[test]
    fn encode_differs_only_in_host() {
        let a = SqlEnvelope::new("SELECT 1", 100).encode("10.0.0.1");
        let b = SqlEnvelope::new("SELECT 1", 100).encode("10.0.0.2");
        assert_ne!(a, b);
        assert_eq!(a.replace("10.0.0.1", "10.0.0.2"), b);
    }

    #[test]
    fn sql_with_cdata_terminator_is_split() {
        let body = SqlEnvelope::new("SELECT ']]>'", 10).encode("h");
        assert!(body.contains("]]]]><![CDATA[>"));
    }

    #[test]
    fn default_limit() {
        let env = SqlEnvelope::with_default_limit("SELECT 1");
        assert_eq!(env.limit(), 100);
    }
}
