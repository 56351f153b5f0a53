//! Client configuration.

use std::time::Duration;

use ip21_auth::Credentials;

/// Which transport carries SQL queries.
///
/// The transport is chosen once at construction time and baked into the
/// client; `history` and `kpi` always go over REST because the legacy web
/// service never exposed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// The ProcessData REST DLL (default).
    #[default]
    Rest,
    /// The legacy SQLplus SOAP web service.
    Soap,
}

/// Configuration for connecting to an IP21 historian.
///
/// Construction validates nothing beyond presence: addresses and credentials
/// are taken as given and any mismatch surfaces as an HTTP-level failure on
/// the first call, mirroring the behavior of the vendor tooling.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Windows-domain credentials for the SQLplus web server.
    pub credentials: Credentials,

    /// Hostname or IP address of the SQLplus web server.
    pub sqlplus_address: String,

    /// Hostname or IP address of the IP21 database, embedded in every
    /// request as the data source.
    pub ip21_address: String,

    /// Transport carrying SQL queries.
    pub transport: TransportMode,

    /// When set, every call emits the request URL, request body, and raw
    /// response body as `tracing` debug events. Observational only.
    pub debug: bool,

    /// Client-side HTTP timeout. Defaults to 35 s, slightly above the 30 s
    /// statement timeout the SQL envelope asks the server to enforce.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::new("", "", ""),
            sqlplus_address: "127.0.0.1".to_string(),
            ip21_address: "127.0.0.1".to_string(),
            transport: TransportMode::Rest,
            debug: false,
            http_timeout: Duration::from_secs(35),
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the SQLplus web server address.
    #[must_use]
    pub fn sqlplus_address(mut self, address: impl Into<String>) -> Self {
        self.sqlplus_address = address.into();
        self
    }

    /// Set the IP21 database address.
    #[must_use]
    pub fn ip21_address(mut self, address: impl Into<String>) -> Self {
        self.ip21_address = address.into();
        self
    }

    /// Select the SQL transport.
    #[must_use]
    pub fn transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    /// Enable or disable request/response debug events.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the client-side HTTP timeout.
    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.sqlplus_address, "127.0.0.1");
        assert_eq!(config.ip21_address, "127.0.0.1");
        assert_eq!(config.transport, TransportMode::Rest);
        assert!(!config.debug);
        assert_eq!(config.http_timeout, Duration::from_secs(35));
    }

    #[test]
    fn builder_chain() {
        let config = Config::new()
            .credentials(Credentials::new("john.doe", "CONTOSO", "pw"))
            .sqlplus_address("sqlplus.plant.local")
            .ip21_address("historian.plant.local")
            .transport(TransportMode::Soap)
            .debug(true)
            .http_timeout(Duration::from_secs(5));
        assert_eq!(config.sqlplus_address, "sqlplus.plant.local");
        assert_eq!(config.ip21_address, "historian.plant.local");
        assert_eq!(config.transport, TransportMode::Soap);
        assert!(config.debug);
        assert_eq!(config.credentials.account(), "john.doe");
    }
}
