//! The historian client.

use ip21_protocol::{HistoryOptions, HistoryRequest, KpiRequest, TagSelection, endpoint, sql};

use crate::config::Config;
use crate::error::Result;
use crate::http::{HttpReply, NtlmHttp};
use crate::response::{ResponseResult, parse_reply};
use crate::transport::{self, SqlTransport};

/// Client for an AspenTech IP21 historian reached through SQLplus.
///
/// Every call is an independent request/response round trip; the client
/// holds no session or cursor state between calls, so one instance can be
/// reused sequentially for any mix of operations. Instances are cheap and
/// fully independent of each other.
///
/// # Example
///
/// ```rust,ignore
/// use ip21_client::{Config, Credentials, Ip21Client};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Ip21Client::new(
///         Config::new()
///             .credentials(Credentials::new("john.doe", "CONTOSO", "secret"))
///             .sqlplus_address("sqlplus.plant.local")
///             .ip21_address("historian.plant.local"),
///     )?;
///
///     let result = client
///         .query("SELECT IP_PLANT_AREA, Name, IP_DESCRIPTION FROM IP_AnalogDef")
///         .await?;
///     println!("{result:?}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Ip21Client {
    config: Config,
    http: NtlmHttp,
    sql_transport: Box<dyn SqlTransport>,
    history_url: String,
    kpi_url: String,
}

impl Ip21Client {
    /// Build a client from a configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = NtlmHttp::new(config.credentials.clone(), config.http_timeout)?;
        let sql_transport = transport::for_config(&config);
        let history_url = endpoint::history_url(&config.sqlplus_address);
        let kpi_url = endpoint::kpi_url(&config.sqlplus_address);
        Ok(Self {
            config,
            http,
            sql_transport,
            history_url,
            kpi_url,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute an ad-hoc SQL query with the default row limit.
    pub async fn query(&self, sql: &str) -> Result<ResponseResult> {
        self.query_with_limit(sql, sql::DEFAULT_ROW_LIMIT).await
    }

    /// Execute an ad-hoc SQL query, returning at most `limit` rows.
    pub async fn query_with_limit(&self, sql: &str, limit: u32) -> Result<ResponseResult> {
        let body = self.sql_transport.encode(sql, limit);
        self.emit_request(self.sql_transport.url(), &body);
        let reply = self.sql_transport.send(&self.http, &body).await?;
        self.emit_response(self.sql_transport.url(), &reply);
        self.sql_transport.interpret(&reply)
    }

    /// Retrieve archived history for one or more tags.
    ///
    /// `tags` accepts a single tag name or a batch; all tags go out in one
    /// request. The window is epoch milliseconds, inclusive.
    pub async fn history(
        &self,
        tags: impl Into<TagSelection>,
        start_ms: i64,
        end_ms: i64,
        options: HistoryOptions,
    ) -> Result<ResponseResult> {
        let request = HistoryRequest::new(tags, start_ms, end_ms, options)?;
        let body = request.encode(&self.config.ip21_address);
        self.emit_request(&self.history_url, &body);
        let reply = self.http.post(&self.history_url, &body, "text/xml", None).await?;
        self.finish(&self.history_url, reply)
    }

    /// Look up the KPI record for a tag.
    pub async fn kpi(&self, tag: &str) -> Result<ResponseResult> {
        let body = KpiRequest::new(tag).encode(&self.config.ip21_address);
        self.emit_request(&self.kpi_url, &body);
        let reply = self
            .http
            .post(
                &self.kpi_url,
                &body,
                "application/x-www-form-urlencoded",
                None,
            )
            .await?;
        self.finish(&self.kpi_url, reply)
    }

    fn emit_request(&self, url: &str, body: &str) {
        if self.config.debug {
            tracing::debug!(url, body, "IP21 request");
        }
    }

    fn emit_response(&self, url: &str, reply: &HttpReply) {
        if self.config.debug {
            tracing::debug!(url, status = reply.status, body = %reply.body, "IP21 response");
        }
    }

    fn finish(&self, url: &str, reply: HttpReply) -> Result<ResponseResult> {
        self.emit_response(url, &reply);
        Ok(parse_reply(&reply)?)
    }
}
