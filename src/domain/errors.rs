//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Failure of a shorten call, surfaced to the host as a numeric code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortenErrorCode {
    /// The HTTP call itself failed (DNS, connection, timeout).
    #[error("transport failure calling the shortener API")]
    Transport,

    #[error("shortener API rejected the request (HTTP 403)")]
    Forbidden,

    #[error("shortener API returned an unexpected status")]
    UnexpectedStatus,
}

impl ShortenErrorCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Transport => 100,
            Self::Forbidden => 4032,
            Self::UnexpectedStatus => 501,
        }
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Input error: {0}")]
    Input(String),
}
