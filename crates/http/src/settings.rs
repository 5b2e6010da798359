//! Serializable settings
//!
//! Settings come from JSON documents or `BITSTAMP_*` environment variables
//! and turn into [`HttpOption`]s. They are external input, so a malformed
//! domain is reported as an error rather than a panic.

use crate::config::{
    auto_rounding_enabled, credentials, request_timeout, try_url_domain, HttpClientConfig,
    HttpOption,
};
use crate::errors::{HttpError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub const ENV_API_URL: &str = "BITSTAMP_API_URL";
pub const ENV_API_KEY: &str = "BITSTAMP_API_KEY";
pub const ENV_API_SECRET: &str = "BITSTAMP_API_SECRET";
pub const ENV_TIMEOUT_MS: &str = "BITSTAMP_TIMEOUT_MS";
pub const ENV_AUTO_ROUNDING: &str = "BITSTAMP_AUTO_ROUNDING";

/// Settings for [`HttpClientConfig`]; absent fields keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub auto_rounding: bool,
    pub timeout_ms: Option<u64>,
}

impl HttpSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `BITSTAMP_*` variables. Unset variables are skipped.
    pub fn from_env() -> Result<Self> {
        let timeout_ms = match env_var(ENV_TIMEOUT_MS) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                HttpError::ConfigurationError(format!("{ENV_TIMEOUT_MS}={raw}: {e}"))
            })?),
            None => None,
        };
        let auto_rounding = match env_var(ENV_AUTO_ROUNDING) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                HttpError::ConfigurationError(format!("{ENV_AUTO_ROUNDING}={raw}: expected a boolean"))
            })?,
            None => false,
        };

        Ok(Self {
            base_url: env_var(ENV_API_URL),
            api_key: env_var(ENV_API_KEY),
            api_secret: env_var(ENV_API_SECRET),
            auto_rounding,
            timeout_ms,
        })
    }

    /// Convert into options, in field order: domain, credentials, rounding, timeout
    pub fn into_options(self) -> Result<Vec<HttpOption>> {
        let mut options = Vec::new();

        if let Some(base_url) = self.base_url {
            options.push(try_url_domain(&base_url)?);
        }
        match (self.api_key, self.api_secret) {
            (Some(key), Some(secret)) => options.push(credentials(key, secret)),
            (None, None) => {}
            (Some(_), None) => return Err(HttpError::MissingCredentials(ENV_API_SECRET.to_string())),
            (None, Some(_)) => return Err(HttpError::MissingCredentials(ENV_API_KEY.to_string())),
        }
        if self.auto_rounding {
            options.push(auto_rounding_enabled());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.push(request_timeout(Duration::from_millis(timeout_ms)));
        }

        Ok(options)
    }

    pub fn into_config(self) -> Result<HttpClientConfig> {
        let options = self.into_options()?;
        info!("🔧 Building Bitstamp HTTP config from {} settings", options.len());
        Ok(HttpClientConfig::build(options))
    }
}

/// Credentials option from `BITSTAMP_API_KEY` and `BITSTAMP_API_SECRET`
pub fn credentials_from_env() -> Result<HttpOption> {
    let api_key = env_var(ENV_API_KEY)
        .ok_or_else(|| HttpError::MissingCredentials(ENV_API_KEY.to_string()))?;
    let api_secret = env_var(ENV_API_SECRET)
        .ok_or_else(|| HttpError::MissingCredentials(ENV_API_SECRET.to_string()))?;

    Ok(credentials(api_key, api_secret))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
