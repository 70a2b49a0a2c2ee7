//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP types here; adapters map wire payloads into these.

use serde_json::Value;

use super::errors::ShortenErrorCode;

/// Key under which the host packages link metadata.
pub const META_INPUT_KEY: &str = "meta_input";

/// Key holding the long URL inside the link metadata.
pub const LINK_URL_KEY: &str = "utmdclink_url";

/// Link data handed over by the host for one shorten call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkData {
    pub long_url: String,
}

impl LinkData {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
        }
    }

    /// Build from the host's data bag. A `meta_input` wrapper is unwrapped first;
    /// a missing or non-string `utmdclink_url` yields an empty long URL.
    pub fn from_value(data: &Value) -> Self {
        let data = data.get(META_INPUT_KEY).unwrap_or(data);
        let long_url = data
            .get(LINK_URL_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::new(long_url)
    }

    /// Long URL with the query string appended verbatim.
    pub fn with_query(&self, query_string: &str) -> String {
        format!("{}{}", self.long_url, query_string)
    }
}

/// Result of one shorten call.
///
/// `Empty` covers both the disabled case (no credential) and a successful
/// status whose body carried no usable link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShortenOutcome {
    Shortened(String),
    Failed(ShortenErrorCode),
    #[default]
    Empty,
}

impl ShortenOutcome {
    /// Short URL, if the call produced one.
    pub fn response(&self) -> Option<&str> {
        match self {
            Self::Shortened(url) => Some(url),
            _ => None,
        }
    }

    /// Error code, if the call failed.
    pub fn error(&self) -> Option<ShortenErrorCode> {
        match self {
            Self::Failed(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
