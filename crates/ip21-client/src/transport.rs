//! SQL transport strategies.
//!
//! The historian exposes SQL execution through two generations of surface:
//! the ProcessData REST DLL and the legacy SQLplus SOAP web service. The
//! choice is a strategy object selected once when the client is built.
//! History and KPI reads exist only on the REST surface and bypass this
//! trait.

use async_trait::async_trait;
use ip21_protocol::{SqlEnvelope, endpoint, soap};

use crate::config::{Config, TransportMode};
use crate::error::Result;
use crate::http::{HttpReply, NtlmHttp};
use crate::response::{ResponseResult, parse_reply};

/// Strategy for carrying an ad-hoc SQL query to the historian.
#[async_trait]
pub(crate) trait SqlTransport: Send + Sync + std::fmt::Debug {
    /// Encode the request body for `sql` with the given row limit.
    fn encode(&self, sql: &str, limit: u32) -> String;

    /// Send the encoded body.
    async fn send(&self, http: &NtlmHttp, body: &str) -> Result<HttpReply>;

    /// Interpret the raw reply as a [`ResponseResult`].
    fn interpret(&self, reply: &HttpReply) -> Result<ResponseResult>;

    /// The URL this transport posts to, for debug events.
    fn url(&self) -> &str;
}

/// Select the transport for a configuration.
pub(crate) fn for_config(config: &Config) -> Box<dyn SqlTransport> {
    match config.transport {
        TransportMode::Rest => Box::new(RestTransport {
            url: endpoint::sql_url(&config.sqlplus_address),
            ip21_address: config.ip21_address.clone(),
        }),
        TransportMode::Soap => Box::new(SoapTransport {
            url: endpoint::soap_url(&config.sqlplus_address),
        }),
    }
}

/// SQL over the ProcessData REST DLL.
#[derive(Debug)]
pub(crate) struct RestTransport {
    url: String,
    ip21_address: String,
}

#[async_trait]
impl SqlTransport for RestTransport {
    fn encode(&self, sql: &str, limit: u32) -> String {
        SqlEnvelope::new(sql, limit).encode(&self.ip21_address)
    }

    async fn send(&self, http: &NtlmHttp, body: &str) -> Result<HttpReply> {
        http.post(&self.url, body, "text/xml", None).await
    }

    fn interpret(&self, reply: &HttpReply) -> Result<ResponseResult> {
        Ok(parse_reply(reply)?)
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// SQL over the legacy SQLplus SOAP web service.
///
/// The row limit has no SOAP equivalent; the web service caps output on its
/// own, so the limit is accepted and ignored here.
#[derive(Debug)]
pub(crate) struct SoapTransport {
    url: String,
}

#[async_trait]
impl SqlTransport for SoapTransport {
    fn encode(&self, sql: &str, _limit: u32) -> String {
        soap::encode_execute_sql(sql)
    }

    async fn send(&self, http: &NtlmHttp, body: &str) -> Result<HttpReply> {
        http.post(
            &self.url,
            body,
            "text/xml; charset=utf-8",
            Some(soap::EXECUTE_SQL_ACTION),
        )
        .await
    }

    fn interpret(&self, reply: &HttpReply) -> Result<ResponseResult> {
        if reply.status != 200 {
            return Ok(parse_reply(reply)?);
        }
        let text = soap::decode_execute_sql(&reply.body)?;
        // The web service returns a string; newer servers emit JSON in it.
        let value =
            serde_json::from_str(&text).unwrap_or_else(|_| serde_json::Value::String(text));
        Ok(ResponseResult::Payload(value))
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ip21_auth::Credentials;

    fn config(transport: TransportMode) -> Config {
        Config::new()
            .credentials(Credentials::new("a", "d", "p"))
            .sqlplus_address("sqlplus.local")
            .ip21_address("ip21.local")
            .transport(transport)
    }

    #[test]
    fn rest_transport_targets_sql_endpoint() {
        let transport = for_config(&config(TransportMode::Rest));
        assert_eq!(
            transport.url(),
            "http://sqlplus.local/ProcessData/AtProcessDataREST.dll/SQL"
        );
        let body = transport.encode("SELECT 1", 7);
        assert!(body.contains("HOST=ip21.local"));
        assert!(body.contains(r#" m="7""#));
    }

    #[test]
    fn soap_transport_targets_asmx() {
        let transport = for_config(&config(TransportMode::Soap));
        assert_eq!(
            transport.url(),
            "http://sqlplus.local/SQLplusWebService/SQLplusWebService.asmx"
        );
        let body = transport.encode("SELECT 1", 7);
        assert!(body.contains("<command>SELECT 1</command>"));
    }
}
