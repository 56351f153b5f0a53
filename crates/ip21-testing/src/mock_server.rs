//! Mock historian HTTP server for unit testing.
//!
//! This module provides a small HTTP/1.1 server that stands in for the
//! SQLplus web server during tests, so no real historian is needed. Routes
//! are matched by path suffix (`SQL`, `History`, `KPI`, the .asmx path) and
//! answer with scripted responses; every request the server sees is recorded
//! for assertions.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ip21_testing::mock_server::{MockHistorianServer, MockResponse};
//!
//! #[tokio::test]
//! async fn test_query() {
//!     let server = MockHistorianServer::builder()
//!         .with_response("SQL", MockResponse::json(r#"{"rows":[]}"#))
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let addr = server.addr();
//!     // Point your client at addr...
//! }
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, broadcast};

use crate::fixtures;

/// Error type for mock server operations.
#[derive(Debug, Error)]
pub enum MockServerError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed HTTP request received.
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Result type for mock server operations.
pub type Result<T> = std::result::Result<T, MockServerError>;

/// A scripted HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Extra response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl MockResponse {
    /// A 200 response with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.into(),
        }
    }

    /// A 200 response with a raw text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// An error response with the given status and body.
    pub fn error(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Headers, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Builder for [`MockHistorianServer`].
#[derive(Debug, Default)]
pub struct MockHistorianBuilder {
    routes: Vec<(String, MockResponse)>,
    ntlm: bool,
}

impl MockHistorianBuilder {
    /// Script a response for requests whose path ends with `suffix`.
    #[must_use]
    pub fn with_response(mut self, suffix: impl Into<String>, response: MockResponse) -> Self {
        self.routes.push((suffix.into(), response));
        self
    }

    /// Demand an NTLM handshake before serving any scripted response.
    ///
    /// Requests without an `Authorization` header get `401` offering NTLM;
    /// a type-1 token gets `401` with a fixed type-2 challenge; a type-3
    /// token is accepted without verification and the route is served.
    #[must_use]
    pub fn with_ntlm_challenge(mut self) -> Self {
        self.ntlm = true;
        self
    }

    /// Bind to an ephemeral localhost port and start serving.
    pub async fn build(self) -> Result<MockHistorianServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown, _) = broadcast::channel(1);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = Arc::new(ServerState {
            routes: self.routes,
            ntlm: self.ntlm,
            requests: Arc::clone(&requests),
        });

        let mut accept_shutdown = shutdown.subscribe();
        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = accept_shutdown.recv() => break,
                    accepted = listener.accept() => {
                        let Ok((stream, peer)) = accepted else { break };
                        tracing::trace!(%peer, "mock historian: connection accepted");
                        let conn_state = Arc::clone(&accept_state);
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, conn_state).await {
                                tracing::debug!(%err, "mock historian: connection ended");
                            }
                        });
                    }
                }
            }
        });

        Ok(MockHistorianServer {
            addr,
            shutdown,
            requests,
        })
    }
}

/// A running mock historian server.
///
/// The server stops when dropped.
#[derive(Debug)]
pub struct MockHistorianServer {
    addr: SocketAddr,
    shutdown: broadcast::Sender<()>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHistorianServer {
    /// Start building a server.
    #[must_use]
    pub fn builder() -> MockHistorianBuilder {
        MockHistorianBuilder::default()
    }

    /// The bound address, suitable as a client's `sqlplus_address`.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// All requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests whose path ends with `suffix`.
    pub async fn requests_for(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|req| req.path.ends_with(suffix))
            .cloned()
            .collect()
    }
}

impl Drop for MockHistorianServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}

struct ServerState {
    routes: Vec<(String, MockResponse)>,
    ntlm: bool,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle_connection(mut stream: TcpStream, state: Arc<ServerState>) -> Result<()> {
    loop {
        let Some(request) = read_request(&mut stream).await? else {
            return Ok(()); // clean EOF between requests
        };
        state.requests.lock().await.push(request.clone());

        let response = route(&state, &request);
        write_response(&mut stream, &response).await?;
    }
}

fn route(state: &ServerState, request: &RecordedRequest) -> MockResponse {
    if state.ntlm {
        match ntlm_gate(request) {
            NtlmGate::Offer => {
                return MockResponse {
                    status: 401,
                    headers: vec![("WWW-Authenticate".into(), "NTLM".into())],
                    body: String::new(),
                };
            }
            NtlmGate::Challenge => {
                return MockResponse {
                    status: 401,
                    headers: vec![(
                        "WWW-Authenticate".into(),
                        format!("NTLM {}", fixtures::ntlm_challenge_base64()),
                    )],
                    body: String::new(),
                };
            }
            NtlmGate::Accept => {}
        }
    }

    state
        .routes
        .iter()
        .find(|(suffix, _)| request.path.ends_with(suffix.as_str()))
        .map(|(_, response)| response.clone())
        .unwrap_or_else(|| MockResponse::error(404, "no route scripted"))
}

enum NtlmGate {
    Offer,
    Challenge,
    Accept,
}

/// Decide the handshake leg from the `Authorization` header alone, so the
/// gate works whether or not the client reuses one connection.
fn ntlm_gate(request: &RecordedRequest) -> NtlmGate {
    let Some(auth) = request.header("authorization") else {
        return NtlmGate::Offer;
    };
    let Some(token_b64) = auth.strip_prefix("NTLM ") else {
        return NtlmGate::Offer;
    };
    let Ok(token) = BASE64.decode(token_b64.trim()) else {
        return NtlmGate::Offer;
    };
    // Message type lives at offset 8 of the NTLMSSP header.
    match token.get(8) {
        Some(1) => NtlmGate::Challenge,
        Some(3) => NtlmGate::Accept,
        _ => NtlmGate::Offer,
    }
}

async fn read_request(stream: &mut TcpStream) -> Result<Option<RecordedRequest>> {
    let mut buf = Vec::with_capacity(1024);
    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(MockServerError::Malformed("truncated headers".into()));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| MockServerError::Malformed("missing request line".into()))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| MockServerError::Malformed("missing method".into()))?
        .to_string();
    let path = parts
        .next()
        .ok_or_else(|| MockServerError::Malformed("missing path".into()))?
        .to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(MockServerError::Malformed("truncated body".into()));
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn write_response(stream: &mut TcpStream, response: &MockResponse) -> Result<()> {
    let reason = match response.status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason);
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    out.push_str("Connection: keep-alive\r\n\r\n");
    out.push_str(&response.body);
    stream.write_all(out.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_scripted_route() {
        let server = MockHistorianServer::builder()
            .with_response("SQL", MockResponse::json(r#"{"ok":true}"#))
            .build()
            .await
            .unwrap();

        let mut stream = TcpStream::connect(server.addr()).await.unwrap();
        let request = "POST /ProcessData/AtProcessDataREST.dll/SQL HTTP/1.1\r\n\
                       Host: test\r\nContent-Length: 4\r\n\r\nbody";
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = vec![0u8; 4096];
        let n = stream.read(&mut response).await.unwrap();
        let response = String::from_utf8_lossy(&response[..n]);
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with(r#"{"ok":true}"#));

        let recorded = server.requests().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].body, "body");
        assert_eq!(recorded[0].method, "POST");
    }

    #[tokio::test]
    async fn unrouted_path_is_404() {
        let server = MockHistorianServer::builder().build().await.unwrap();
        let mut stream = TcpStream::connect(server.addr()).await.unwrap();
        stream
            .write_all(b"POST /nothing HTTP/1.1\r\nContent-Length: 0\r\n\r\n")
            .await
            .unwrap();
        let mut response = vec![0u8; 1024];
        let n = stream.read(&mut response).await.unwrap();
        assert!(String::from_utf8_lossy(&response[..n]).starts_with("HTTP/1.1 404"));
    }
}
