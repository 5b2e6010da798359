//! Bitstamp HTTP client configuration
//!
//! A configuration starts from [`HttpClientConfig::default`] and is adjusted by
//! an ordered list of [`HttpOption`]s. Later options win when they touch the
//! same field. Once built the value is read-only.
//!
//! ```no_run
//! use bitstamp_http::config::{credentials, request_timeout, HttpClientConfig};
//! use std::time::Duration;
//!
//! let config = HttpClientConfig::build([
//!     credentials("key", "secret"),
//!     request_timeout(Duration::from_secs(5)),
//! ]);
//! assert_eq!(config.api_key(), "key");
//! ```

use crate::errors::{HttpError, Result};
use crate::transport::{default_transport, HttpRequest, Method, SharedTransport};
use bitstamp_core::{generate_nonce, timestamp};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Default REST endpoint
pub const BITSTAMP_HTTP_API_URL: &str = "https://www.bitstamp.net/api";

/// Default bound on outbound requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Produces a fresh nonce per call
pub type NonceGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Produces the current wire timestamp. Fixed by the API, so no option
/// replaces it.
pub type TimestampGenerator = fn() -> String;

/// Configuration handed to the request layer
#[derive(Clone)]
pub struct HttpClientConfig {
    transport: SharedTransport,
    domain: Url,
    api_key: String,
    api_secret: String,
    nonce_generator: NonceGenerator,
    timestamp_generator: TimestampGenerator,
    /// Round prices and amounts to the pair's decimal places before sending.
    /// Consumer convenience only.
    auto_rounding: bool,
    request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            domain: parse_domain(BITSTAMP_HTTP_API_URL),
            api_key: String::new(),
            api_secret: String::new(),
            nonce_generator: Arc::new(generate_nonce),
            timestamp_generator: timestamp,
            auto_rounding: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl HttpClientConfig {
    /// Apply `options` in order over the default configuration
    pub fn build<I>(options: I) -> Self
    where
        I: IntoIterator<Item = HttpOption>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }

        debug!(
            "🔧 Bitstamp HTTP config: domain={} timeout={}ms auto_rounding={} authenticated={} transport={}",
            config.domain,
            config.request_timeout.as_millis(),
            config.auto_rounding,
            config.has_credentials(),
            config.transport.name()
        );
        config
    }

    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    pub fn domain(&self) -> &Url {
        &self.domain
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Both credentials present
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    pub fn auto_rounding(&self) -> bool {
        self.auto_rounding
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fresh nonce from the configured generator
    pub fn nonce(&self) -> String {
        (self.nonce_generator)()
    }

    /// Current time in the wire format: milliseconds since the epoch, UTC
    pub fn timestamp(&self) -> String {
        (self.timestamp_generator)()
    }

    /// Resolve an API path below the configured domain.
    ///
    /// The domain's own path is kept as a prefix, so `v2/ticker/btcusd/`
    /// against `https://www.bitstamp.net/api` gives
    /// `https://www.bitstamp.net/api/v2/ticker/btcusd/`. A query string in
    /// `path` is carried over.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        if self.domain.cannot_be_a_base() {
            return Err(HttpError::ConfigurationError(format!(
                "domain {} cannot be used as a base URL",
                self.domain
            )));
        }

        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.domain.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
        url.set_query(query);
        url.set_fragment(None);
        Ok(url)
    }

    /// Request for `path` carrying the configured timeout
    pub fn new_request(&self, method: Method, path: &str) -> Result<HttpRequest> {
        let url = self.endpoint(path)?;
        Ok(HttpRequest::new(method, url).with_timeout(self.request_timeout))
    }
}

impl fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("transport", &self.transport.name())
            .field("domain", &self.domain.as_str())
            .field("api_key", &self.api_key)
            .field("api_secret", &if self.api_secret.is_empty() { "" } else { "<redacted>" })
            .field("auto_rounding", &self.auto_rounding)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// One configuration mutation, applied by [`HttpClientConfig::build`]
pub struct HttpOption(Box<dyn FnOnce(&mut HttpClientConfig) + Send>);

impl HttpOption {
    fn new(f: impl FnOnce(&mut HttpClientConfig) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    fn apply(self, config: &mut HttpClientConfig) {
        (self.0)(config)
    }
}

impl fmt::Debug for HttpOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HttpOption")
    }
}

/// Replace the base domain.
///
/// # Panics
///
/// Panics immediately if `raw_domain` is not a valid absolute URL. Use
/// [`try_url_domain`] for values that come from outside the program.
pub fn url_domain(raw_domain: &str) -> HttpOption {
    let domain = parse_domain(raw_domain);
    HttpOption::new(move |config| config.domain = domain)
}

/// Fallible variant of [`url_domain`] for user-supplied domains.
///
/// Also rejects URLs that cannot carry a path, such as `mailto:` links.
pub fn try_url_domain(raw_domain: &str) -> Result<HttpOption> {
    let domain = Url::parse(raw_domain)?;
    if domain.cannot_be_a_base() {
        return Err(HttpError::InvalidUrl(format!(
            "{raw_domain} cannot be used as a base URL"
        )));
    }
    Ok(HttpOption::new(move |config| config.domain = domain))
}

pub fn credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> HttpOption {
    let api_key = api_key.into();
    let api_secret = api_secret.into();
    HttpOption::new(move |config| {
        config.api_key = api_key;
        config.api_secret = api_secret;
    })
}

pub fn auto_rounding_enabled() -> HttpOption {
    HttpOption::new(|config| config.auto_rounding = true)
}

/// Use `transport` instead of the shared default
pub fn with_transport(transport: SharedTransport) -> HttpOption {
    HttpOption::new(move |config| config.transport = transport)
}

/// Replace the request timeout. Not validated; a zero timeout fails every
/// request.
pub fn request_timeout(timeout: Duration) -> HttpOption {
    HttpOption::new(move |config| config.request_timeout = timeout)
}

pub fn nonce_generator<F>(generator: F) -> HttpOption
where
    F: Fn() -> String + Send + Sync + 'static,
{
    let generator: NonceGenerator = Arc::new(generator);
    HttpOption::new(move |config| config.nonce_generator = generator)
}

fn parse_domain(raw_domain: &str) -> Url {
    match Url::parse(raw_domain) {
        Ok(domain) => domain,
        Err(err) => {
            error!("❌ error parsing domain {raw_domain}: {err}");
            panic!("error parsing domain {raw_domain}: {err}");
        }
    }
}

/// Chainable collector of [`HttpOption`]s
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    options: Vec<HttpOption>,
}

impl HttpClientConfigBuilder {
    pub fn with_option(mut self, option: HttpOption) -> Self {
        self.options.push(option);
        self
    }

    /// See [`url_domain`]; panics on a malformed domain.
    pub fn with_url_domain(self, raw_domain: &str) -> Self {
        self.with_option(url_domain(raw_domain))
    }

    pub fn with_credentials(self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.with_option(credentials(api_key, api_secret))
    }

    pub fn with_auto_rounding(self) -> Self {
        self.with_option(auto_rounding_enabled())
    }

    pub fn with_transport(self, transport: SharedTransport) -> Self {
        self.with_option(with_transport(transport))
    }

    pub fn with_request_timeout(self, timeout: Duration) -> Self {
        self.with_option(request_timeout(timeout))
    }

    pub fn with_nonce_generator<F>(self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.with_option(nonce_generator(generator))
    }

    pub fn build(self) -> HttpClientConfig {
        HttpClientConfig::build(self.options)
    }
}
