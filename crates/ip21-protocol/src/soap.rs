//! SOAP envelope encoding for the legacy SQLplus web service.
//!
//! Early deployments expose SQL execution only through an .asmx web service
//! (`ExecuteSQL`) instead of the ProcessData REST DLL. The envelope is SOAP
//! 1.1 with the vendor's document namespace; the response carries the result
//! as text inside an `ExecuteSQLResult` element.

use crate::error::ProtocolError;
use crate::xml::{element_text, escape_text, unescape_text};

/// Namespace of the SQLplus web service.
pub const SERVICE_NAMESPACE: &str = "http://www.aspentech.com/SQLplus.WebService/";

/// `SOAPAction` header value for the `ExecuteSQL` operation.
pub const EXECUTE_SQL_ACTION: &str = "http://www.aspentech.com/SQLplus.WebService/ExecuteSQL";

/// Encode the `ExecuteSQL` request envelope.
#[must_use]
pub fn encode_execute_sql(sql: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<soap:Body>",
            r#"<ExecuteSQL xmlns="{ns}">"#,
            "<command>{command}</command>",
            "</ExecuteSQL>",
            "</soap:Body>",
            "</soap:Envelope>"
        ),
        ns = SERVICE_NAMESPACE,
        command = escape_text(sql),
    )
}

/// Extract the `ExecuteSQLResult` text from a response envelope.
///
/// A SOAP fault surfaces as [`ProtocolError::MissingElement`] carrying the
/// fault string when the service returned one.
pub fn decode_execute_sql(xml: &str) -> Result<String, ProtocolError> {
    if let Some(text) = element_text(xml, "ExecuteSQLResult") {
        return Ok(unescape_text(text));
    }
    if let Some(fault) = element_text(xml, "faultstring") {
        return Err(ProtocolError::MissingElement(format!(
            "ExecuteSQLResult (SOAP fault: {})",
            unescape_text(fault)
        )));
    }
    Err(ProtocolError::MissingElement("ExecuteSQLResult".into()))
}
