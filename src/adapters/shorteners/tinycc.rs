//! tiny.cc adapter. Implements ShortenerPort via the tiny.cc REST API.
//!
//! One POST per call, no retries. Transport and status failures are mapped to
//! numeric error codes; a success status without a usable link yields
//! `ShortenOutcome::Empty`.

use crate::adapters::shorteners::url_safety::{EscUrlSanitizer, is_absolute_url};
use crate::domain::{DomainError, LinkData, ShortenErrorCode, ShortenOutcome};
use crate::ports::{ShortenerPort, UrlSanitizer};
use reqwest::{Client, StatusCode, redirect};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Base of the tiny.cc REST API. The endpoint is appended as a string.
pub const TINYCC_API_URL: &str = "http://tiny.cc/?c=rest_api";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_MAX_REDIRECTS: usize = 5;

#[derive(Serialize)]
struct ShortenRequest {
    long_url: String,
}

/// tiny.cc shortener.
///
/// An empty `api_key` disables the adapter: `shorten` returns
/// `ShortenOutcome::Empty` without touching the network.
pub struct TinyCcShortener {
    client: Client,
    api_url: String,
    api_key: String,
    sanitizer: Arc<dyn UrlSanitizer>,
}

impl TinyCcShortener {
    /// Create an adapter against the public tiny.cc API with default limits.
    pub fn new(api_key: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_options(
            TINYCC_API_URL,
            api_key,
            DEFAULT_TIMEOUT,
            DEFAULT_MAX_REDIRECTS,
        )
    }

    /// Create an adapter with explicit API base, timeout and redirect limit.
    ///
    /// # Arguments
    /// * `api_url` - API base, `/shorten` is appended verbatim
    /// * `api_key` - Bearer token (empty disables the adapter)
    /// * `timeout` - Upper bound for the whole request
    /// * `max_redirects` - Redirects followed before giving up
    pub fn with_options(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        max_redirects: usize,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .http1_only()
            .build()
            .map_err(|e| DomainError::HttpClient(format!("build client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            sanitizer: Arc::new(EscUrlSanitizer),
        })
    }

    /// Replace the sanitizer applied to returned links.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn UrlSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/shorten", self.api_url)
    }

    /// Map status and parsed body to an outcome.
    fn classify(&self, status: StatusCode, body: &Value) -> ShortenOutcome {
        match status {
            StatusCode::OK | StatusCode::CREATED => {
                let link = body.get("link").and_then(Value::as_str).unwrap_or_default();
                let sanitized = if is_absolute_url(link) {
                    self.sanitizer.sanitize(link)
                } else {
                    None
                };
                match sanitized {
                    Some(url) => ShortenOutcome::Shortened(url),
                    None => {
                        warn!(
                            status = status.as_u16(),
                            link, "tiny.cc returned success without a valid link"
                        );
                        ShortenOutcome::Empty
                    }
                }
            }
            StatusCode::FORBIDDEN => ShortenOutcome::Failed(ShortenErrorCode::Forbidden),
            _ => ShortenOutcome::Failed(ShortenErrorCode::UnexpectedStatus),
        }
    }
}

#[async_trait::async_trait]
impl ShortenerPort for TinyCcShortener {
    async fn shorten(&self, data: &LinkData, query_string: &str) -> ShortenOutcome {
        if !self.is_enabled() {
            debug!("tiny.cc API key not set, skipping shorten");
            return ShortenOutcome::Empty;
        }

        let request = ShortenRequest {
            long_url: data.with_query(query_string),
        };
        info!(long_url = %request.long_url, "sending shorten request to tiny.cc");

        let response = match self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "tiny.cc request failed");
                return ShortenOutcome::Failed(ShortenErrorCode::Transport);
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "tiny.cc response body read failed");
                return ShortenOutcome::Failed(ShortenErrorCode::Transport);
            }
        };
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        debug!(status = status.as_u16(), body_len = text.len(), "tiny.cc responded");

        let outcome = self.classify(status, &body);
        if let Some(code) = outcome.error() {
            warn!(
                status = status.as_u16(),
                code = code.code(),
                body = %text.chars().take(200).collect::<String>(),
                "tiny.cc returned error"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "secret-key";

    fn shortener_for(server: &MockServer, key: &str) -> TinyCcShortener {
        TinyCcShortener::with_options(
            format!("{}/?c=rest_api", server.uri()),
            key,
            Duration::from_secs(5),
            DEFAULT_MAX_REDIRECTS,
        )
        .unwrap()
    }

    fn shorten_endpoint() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(query_param("c", "rest_api/shorten"))
    }

    fn link(url: &str) -> LinkData {
        LinkData::new(url)
    }

    #[tokio::test]
    async fn test_empty_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, "")
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome, ShortenOutcome::Empty);
        assert_eq!(outcome.response(), None);
        assert_eq!(outcome.error(), None);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_returns_link() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .and(header("Authorization", "Bearer secret-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "link": "http://tiny.cc/abc123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com/page"), "")
            .await;

        assert_eq!(outcome.response(), Some("http://tiny.cc/abc123"));
        assert_eq!(outcome.error(), None);
    }

    #[tokio::test]
    async fn test_created_status_is_success() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "link": "http://tiny.cc/new1" })),
            )
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome, ShortenOutcome::Shortened("http://tiny.cc/new1".into()));
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_4032() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "bad key" })))
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.error().map(ShortenErrorCode::code), Some(4032));
        assert_eq!(outcome.response(), None);
    }

    #[tokio::test]
    async fn test_other_statuses_map_to_501() {
        for status in [500u16, 404, 400] {
            let server = MockServer::start().await;
            shorten_endpoint()
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let outcome = shortener_for(&server, KEY)
                .shorten(&link("https://example.com"), "")
                .await;

            assert_eq!(
                outcome.error(),
                Some(ShortenErrorCode::UnexpectedStatus),
                "status {}",
                status
            );
        }
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_100() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let shortener = TinyCcShortener::with_options(
            format!("http://127.0.0.1:{}/?c=rest_api", port),
            KEY,
            Duration::from_secs(5),
            DEFAULT_MAX_REDIRECTS,
        )
        .unwrap();

        let outcome = shortener.shorten(&link("https://example.com"), "").await;

        assert_eq!(outcome.error().map(ShortenErrorCode::code), Some(100));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_100() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "http://tiny.cc/slow" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let shortener = TinyCcShortener::with_options(
            format!("{}/?c=rest_api", server.uri()),
            KEY,
            Duration::from_millis(200),
            DEFAULT_MAX_REDIRECTS,
        )
        .unwrap();

        let outcome = shortener.shorten(&link("https://example.com"), "").await;

        assert_eq!(outcome.error(), Some(ShortenErrorCode::Transport));
    }

    #[tokio::test]
    async fn test_invalid_link_is_silent_empty() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "link": "not-a-url" })))
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.response(), None);
        assert_eq!(outcome.error(), None);
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_empty() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_long_url_is_concatenated_with_query_string() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .and(body_json(json!({ "long_url": "https://example.com?utm_source=x" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "link": "http://tiny.cc/utm1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data = LinkData::from_value(&json!({
            "meta_input": { "utmdclink_url": "https://example.com" }
        }));
        let outcome = shortener_for(&server, KEY)
            .shorten(&data, "?utm_source=x")
            .await;

        assert_eq!(outcome.response(), Some("http://tiny.cc/utm1"));
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/moved", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(path("/moved"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "link": "http://tiny.cc/moved" })),
            )
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.response(), Some("http://tiny.cc/moved"));
    }

    #[tokio::test]
    async fn test_redirect_loop_maps_to_100() {
        let server = MockServer::start().await;
        let loop_url = format!("{}/loop", server.uri());
        shorten_endpoint()
            .respond_with(ResponseTemplate::new(307).insert_header("Location", loop_url.as_str()))
            .mount(&server)
            .await;
        Mock::given(path("/loop"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", loop_url.as_str()))
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.error(), Some(ShortenErrorCode::Transport));
    }

    /// Serves one response whose body is shorter than its Content-Length, then closes.
    async fn truncated_body_server(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            // request body is a JSON object, so it ends with '}'
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.ends_with(b"}") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n{{\"link\":",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/?c=rest_api", addr)
    }

    #[tokio::test]
    async fn test_truncated_body_maps_to_100() {
        for status_line in ["500 Internal Server Error", "200 OK"] {
            let shortener = TinyCcShortener::with_options(
                truncated_body_server(status_line).await,
                KEY,
                Duration::from_secs(5),
                DEFAULT_MAX_REDIRECTS,
            )
            .unwrap();

            let outcome = shortener.shorten(&link("https://example.com"), "").await;

            assert_eq!(
                outcome.error(),
                Some(ShortenErrorCode::Transport),
                "status {}",
                status_line
            );
        }
    }

    #[tokio::test]
    async fn test_disallowed_scheme_link_is_empty() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "javascript://x/%0Aalert(1)" })),
            )
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome, ShortenOutcome::Empty);
    }

    #[tokio::test]
    async fn test_link_is_sanitized() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "http://tiny.cc/abc?a=1&b=2" })),
            )
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.response(), Some("http://tiny.cc/abc?a=1&#038;b=2"));
    }

    struct StripQuery;

    impl UrlSanitizer for StripQuery {
        fn sanitize(&self, url: &str) -> Option<String> {
            url.split('?').next().map(str::to_string)
        }
    }

    #[tokio::test]
    async fn test_custom_sanitizer_is_applied() {
        let server = MockServer::start().await;
        shorten_endpoint()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "http://tiny.cc/abc?ref=api" })),
            )
            .mount(&server)
            .await;

        let outcome = shortener_for(&server, KEY)
            .with_sanitizer(Arc::new(StripQuery))
            .shorten(&link("https://example.com"), "")
            .await;

        assert_eq!(outcome.response(), Some("http://tiny.cc/abc"));
    }

    #[test]
    fn test_default_constructor() {
        assert!(!TinyCcShortener::new("").unwrap().is_enabled());
        let shortener = TinyCcShortener::new(KEY).unwrap();
        assert!(shortener.is_enabled());
        assert_eq!(shortener.endpoint(), "http://tiny.cc/?c=rest_api/shorten");
    }
}
