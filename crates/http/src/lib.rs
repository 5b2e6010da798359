//! # Bitstamp HTTP
//!
//! Configuration and transport for the Bitstamp REST API.
//!
//! ## Architecture
//!
//! - **Option-based configuration** - defaults plus ordered, last-write-wins options
//! - **Fail-fast domains** - malformed literal URLs panic at construction time
//! - **Pluggable transport** - shared monoio HTTPS client by default, any [`HttpTransport`] otherwise
//! - **Fixed wire timestamps** - milliseconds since the epoch, never overridable
//! - **Settings loading** - JSON documents and `BITSTAMP_*` environment variables

pub mod config;
pub mod errors;
pub mod https;
pub mod rounding;
pub mod settings;
pub mod transport;

// Re-export main types
pub use config::{
    auto_rounding_enabled, credentials, nonce_generator, request_timeout, try_url_domain,
    url_domain, with_transport, HttpClientConfig, HttpClientConfigBuilder, HttpOption,
    BITSTAMP_HTTP_API_URL, DEFAULT_REQUEST_TIMEOUT,
};
pub use errors::{HttpError, Result};
pub use https::MonoioTransport;
pub use settings::{credentials_from_env, HttpSettings};
pub use transport::{default_transport, HttpRequest, HttpResponse, HttpTransport, Method, SharedTransport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::errors::{HttpError, Result};
    pub use crate::settings::{credentials_from_env, HttpSettings};
    pub use crate::transport::*;
    pub use bitstamp_core::prelude::*;
}
