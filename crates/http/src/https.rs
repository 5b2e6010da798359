//! Monoio-native HTTPS/1.1 transport
//!
//! - Single-threaded async with monoio
//! - TLS through rustls with the webpki root store
//! - One connection per request (`Connection: close`)

use crate::errors::{HttpError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bitstamp_core::Timestamp;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

const USER_AGENT: &str = "bitstamp-rs/0.1";
const READ_CHUNK: usize = 8192;

/// Default transport: HTTPS over monoio TCP streams
///
/// # Panics
///
/// Executing a request that carries a timeout panics unless the current
/// monoio runtime was built with the timer enabled
/// (`RuntimeBuilder::enable_timer`, or `#[monoio::test(enable_timer = true)]`).
/// Requests built through [`HttpClientConfig::new_request`] always carry one.
///
/// [`HttpClientConfig::new_request`]: crate::config::HttpClientConfig::new_request
pub struct MonoioTransport {
    tls_config: Arc<ClientConfig>,
}

impl MonoioTransport {
    pub fn new() -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(tls_config),
        }
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = &request.url;
        if url.scheme() != "https" {
            return Err(HttpError::InvalidUrl(format!(
                "unsupported scheme '{}' in {url}",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl(format!("no host in {url}")))?;
        let port = url.port_or_known_default().unwrap_or(443);

        let tcp = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| HttpError::NetworkError(format!("TCP connect to {host}:{port} failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| HttpError::NetworkError(format!("Invalid server name {host}: {e:?}")))?;
        let conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| HttpError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut stream = TlsStream::new(tcp, conn);
        stream.write_all(encode_request(request).as_bytes()).await?;
        let raw = stream.read_to_end().await?;

        parse_response(&raw)
    }
}

impl Default for MonoioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MonoioTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let start = Timestamp::now();
        debug!("➡️  {} {}", request.method, request.url);

        let response = match request.timeout {
            // Requires a runtime built with the timer enabled.
            Some(limit) => monoio::time::timeout(limit, self.send(&request))
                .await
                .map_err(|_| HttpError::Timeout(limit.as_millis()))?,
            None => self.send(&request).await,
        };

        match &response {
            Ok(resp) => {
                bitstamp_core::log_latency!(
                    format!("{} {} -> {}", request.method, request.url.path(), resp.status),
                    start.elapsed_micros()
                );
            }
            Err(err) => {
                bitstamp_core::log_error!(format!("{} {}", request.method, request.url), err);
            }
        }
        response
    }

    fn name(&self) -> &str {
        "monoio-https"
    }
}

/// Serialize a request into an HTTP/1.1 message
fn encode_request(request: &HttpRequest) -> String {
    let url = &request.url;
    let mut target = url.path().to_string();
    if target.is_empty() {
        target.push('/');
    }
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    let body = request.body.as_deref().unwrap_or("");

    let mut message = format!(
        "{} {target} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Connection: close\r\n\
         Content-Length: {}\r\n",
        request.method,
        body.len()
    );
    for (name, value) in &request.headers {
        message.push_str(&format!("{name}: {value}\r\n"));
    }
    message.push_str("\r\n");
    message.push_str(body);
    message
}

/// Parse a raw HTTP/1.1 response, decoding chunked bodies
fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| HttpError::InvalidResponse("no header terminator".to_string()))?;

    let head = String::from_utf8_lossy(&data[..header_end]);
    let body = &data[header_end + 4..];
    let mut lines = head.lines();

    let status_line = lines
        .next()
        .ok_or_else(|| HttpError::InvalidResponse("empty response".to_string()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| HttpError::InvalidResponse(format!("invalid status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let chunked = headers.iter().any(|(key, value)| {
        key.eq_ignore_ascii_case("transfer-encoding") && value.eq_ignore_ascii_case("chunked")
    });
    let body = if chunked { decode_chunked(body)? } else { body.to_vec() };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    loop {
        let line_end = data
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| HttpError::InvalidResponse("truncated chunk size".to_string()))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        // Chunk extensions follow a ';'
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| HttpError::InvalidResponse(format!("invalid chunk size: {size_hex}")))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }
        if data.len() < size {
            return Err(HttpError::InvalidResponse("truncated chunk".to_string()));
        }
        out.extend_from_slice(&data[..size]);
        data = data.get(size + 2..).unwrap_or(&[]);
    }
}

/// rustls client connection driven over a monoio TCP stream
struct TlsStream {
    stream: TcpStream,
    conn: ClientConnection,
    write_buf: Vec<u8>,
}

impl TlsStream {
    fn new(stream: TcpStream, conn: ClientConnection) -> Self {
        Self {
            stream,
            conn,
            write_buf: Vec::with_capacity(READ_CHUNK),
        }
    }

    /// Send every pending TLS record to the socket
    async fn flush_tls(&mut self) -> Result<()> {
        while self.conn.wants_write() {
            self.write_buf.clear();
            self.conn
                .write_tls(&mut self.write_buf)
                .map_err(|e| HttpError::NetworkError(format!("TLS write failed: {e}")))?;

            if !self.write_buf.is_empty() {
                let buf = std::mem::take(&mut self.write_buf);
                let (result, buf) = self.stream.write_all(buf).await;
                self.write_buf = buf;
                result.map_err(|e| HttpError::NetworkError(format!("TCP write failed: {e}")))?;
            }
        }
        Ok(())
    }

    /// Read one batch of ciphertext and feed it to rustls. Returns false on EOF.
    async fn fill_tls(&mut self) -> Result<bool> {
        let (result, buf) = self.stream.read(vec![0u8; READ_CHUNK]).await;
        let n = result.map_err(|e| HttpError::NetworkError(format!("TCP read failed: {e}")))?;
        if n == 0 {
            return Ok(false);
        }

        self.conn
            .read_tls(&mut std::io::Cursor::new(&buf[..n]))
            .map_err(|e| HttpError::NetworkError(format!("TLS read failed: {e}")))?;
        self.conn
            .process_new_packets()
            .map_err(|e| HttpError::NetworkError(format!("TLS process failed: {e}")))?;
        Ok(true)
    }

    async fn handshake(&mut self) -> Result<()> {
        while self.conn.is_handshaking() {
            self.flush_tls().await?;
            if !self.conn.is_handshaking() {
                break;
            }
            if !self.conn.wants_read() {
                return Err(HttpError::NetworkError("TLS handshake stalled".to_string()));
            }
            if !self.fill_tls().await? {
                return Err(HttpError::NetworkError(
                    "Connection closed during handshake".to_string(),
                ));
            }
        }
        self.flush_tls().await
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.handshake().await?;
        self.conn
            .writer()
            .write_all(data)
            .map_err(|e| HttpError::NetworkError(format!("TLS application write failed: {e}")))?;
        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        let mut plain = vec![0u8; READ_CHUNK];

        loop {
            match self.conn.reader().read(&mut plain) {
                Ok(0) => break, // close_notify received
                Ok(n) => {
                    response.extend_from_slice(&plain[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                // Peers that drop the socket without close_notify
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(HttpError::NetworkError(format!("TLS read failed: {e}"))),
            }

            if !self.fill_tls().await? {
                break;
            }
        }

        Ok(response)
    }
}
