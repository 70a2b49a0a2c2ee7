//! Application configuration. API credentials, endpoint, HTTP limits.

use crate::adapters::shorteners::tinycc::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, TINYCC_API_URL};
use crate::domain::DomainError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// tiny.cc bearer token. Read from SHORTEN_API_KEY or TINYCC_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base; `/shorten` is appended. Read from SHORTEN_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (default 15). Read from SHORTEN_TIMEOUT_SECS.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Redirects followed per request (default 5). Read from SHORTEN_MAX_REDIRECTS.
    #[serde(default)]
    pub max_redirects: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, DomainError> {
        dotenv::dotenv().ok();
        let config_file = std::env::var("SHORTEN_CONFIG").ok();
        Self::from_sources(config_file.as_deref())
    }

    /// Build from `SHORTEN_*` env plus an optional config file.
    pub fn from_sources(config_file: Option<&str>) -> Result<Self, DomainError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SHORTEN"));
        if let Some(path) = config_file {
            c = c.add_source(config::File::with_name(path));
        }
        let mut cfg: Self = c
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| DomainError::Config(e.to_string()))?;
        // Numeric env values arrive as strings; parse them directly so bad values fall back to defaults
        if let Ok(s) = std::env::var("SHORTEN_TIMEOUT_SECS") {
            cfg.timeout_secs = s.parse::<u64>().ok();
        }
        if let Ok(s) = std::env::var("SHORTEN_MAX_REDIRECTS") {
            cfg.max_redirects = s.parse::<usize>().ok();
        }
        Ok(cfg)
    }

    /// Returns the API key from config or TINYCC_API_KEY env.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("TINYCC_API_KEY").ok())
    }

    /// Returns the API base. Defaults to the public tiny.cc endpoint.
    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| TINYCC_API_URL.to_string())
    }

    /// Returns request timeout in seconds. Defaults to 15.
    pub fn timeout_secs_or_default(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs())
    }

    /// Returns the redirect limit. Defaults to 5.
    pub fn max_redirects_or_default(&self) -> usize {
        self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS)
    }

    /// Returns true if a non-empty API key is configured.
    pub fn is_tinycc_configured(&self) -> bool {
        self.api_key().is_some_and(|k| !k.is_empty())
    }
}
