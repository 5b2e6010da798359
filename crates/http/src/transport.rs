//! Transport abstraction consumed by [`crate::HttpClientConfig`]
//!
//! A transport executes one HTTP request and returns the response or an
//! error. The configuration only holds a shared handle; it never owns or
//! closes the transport.

use crate::errors::{HttpError, Result};
use crate::https::MonoioTransport;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use url::Url;

/// Shared, externally owned transport handle
pub type SharedTransport = Arc<dyn HttpTransport>;

static DEFAULT_TRANSPORT: OnceLock<SharedTransport> = OnceLock::new();

/// Anything that can execute an HTTP request
///
/// Futures are not required to be `Send`: the default transport runs on the
/// thread-per-core monoio runtime.
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    /// Execute a request, honouring `request.timeout` when set
    ///
    /// # Panics
    ///
    /// Implementations may rely on the runtime's timer to enforce the timeout.
    /// The default transport panics when it is missing.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "custom"
    }
}

/// Process-wide default transport, created on first use and shared by every
/// configuration that does not replace it
///
/// # Panics
///
/// The returned [`MonoioTransport`](crate::https::MonoioTransport) panics on
/// `execute` with a timeout set when the monoio runtime was built without
/// the timer.
pub fn default_transport() -> SharedTransport {
    DEFAULT_TRANSPORT
        .get_or_init(|| Arc::new(MonoioTransport::new()) as SharedTransport)
        .clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// First header value with the given name, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Turn non-2xx responses into [`HttpError::HttpStatus`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::HttpStatus(self.status, self.body))
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
