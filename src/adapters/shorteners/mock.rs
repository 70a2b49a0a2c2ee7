//! Mock shortener for testing without API calls.
//!
//! Returns deterministic short links, or a fixed outcome when configured.

use crate::domain::{LinkData, ShortenOutcome};
use crate::ports::ShortenerPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Mock shortener.
///
/// Without a fixed outcome it answers `https://tiny.cc/mock-<n>` where `n` is
/// the length of the long URL including the query string.
pub struct MockShortener {
    outcome: Option<ShortenOutcome>,
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockShortener {
    pub fn new() -> Self {
        Self {
            outcome: None,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with `outcome`.
    pub fn with_outcome(outcome: ShortenOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            ..Self::new()
        }
    }

    /// Simulate network latency.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of shorten calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockShortener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ShortenerPort for MockShortener {
    async fn shorten(&self, data: &LinkData, query_string: &str) -> ShortenOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let long_url = data.with_query(query_string);
        info!(long_url = %long_url, "[MOCK] Simulating shorten");

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => ShortenOutcome::Shortened(format!("https://tiny.cc/mock-{}", long_url.len())),
        }
    }
}
