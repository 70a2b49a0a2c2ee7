//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{LinkData, ShortenOutcome};

/// URL shortening provider. One implementation per remote service.
///
/// Failures never escape as `Err`: they are folded into the returned
/// [`ShortenOutcome`] so every provider reports them the same way.
#[async_trait::async_trait]
pub trait ShortenerPort: Send + Sync {
    /// Shorten `data.long_url` with `query_string` appended verbatim.
    async fn shorten(&self, data: &LinkData, query_string: &str) -> ShortenOutcome;
}

/// Sanitization applied to a validated short URL before it is handed to the host.
pub trait UrlSanitizer: Send + Sync {
    /// `None` when the URL is not safe to embed at all (e.g. a disallowed scheme).
    fn sanitize(&self, url: &str) -> Option<String>;
}
