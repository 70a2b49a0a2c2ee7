//! Shorten use case. Drives one ShortenerPort and keeps the last outcome.
//!
//! Hosts that poll for results after the call read `get_response` / `get_error`.
//! Both are cleared at the start of every call, so a reused service never
//! reports a result from an earlier call.

use crate::domain::{LinkData, ShortenErrorCode, ShortenOutcome};
use crate::ports::ShortenerPort;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

pub struct ShortenService {
    shortener: Arc<dyn ShortenerPort>,
    last: Mutex<ShortenOutcome>,
}

impl ShortenService {
    pub fn new(shortener: Arc<dyn ShortenerPort>) -> Self {
        Self {
            shortener,
            last: Mutex::new(ShortenOutcome::Empty),
        }
    }

    /// Shorten from the host's data bag (`utmdclink_url`, optionally under `meta_input`).
    pub async fn shorten(&self, data: &Value, query_string: &str) -> ShortenOutcome {
        self.shorten_link(&LinkData::from_value(data), query_string)
            .await
    }

    /// Shorten an already extracted link.
    pub async fn shorten_link(&self, link: &LinkData, query_string: &str) -> ShortenOutcome {
        self.store(ShortenOutcome::Empty);

        let outcome = self.shortener.shorten(link, query_string).await;
        match &outcome {
            ShortenOutcome::Shortened(url) => info!(short_url = %url, "link shortened"),
            ShortenOutcome::Failed(code) => {
                warn!(code = code.code(), error = %code, "shorten failed")
            }
            ShortenOutcome::Empty => info!("shorten produced no link"),
        }

        self.store(outcome.clone());
        outcome
    }

    /// Short URL stored by the last call, if any.
    pub fn get_response(&self) -> Option<String> {
        self.lock().response().map(str::to_string)
    }

    /// Error code stored by the last call, if any.
    pub fn get_error(&self) -> Option<ShortenErrorCode> {
        self.lock().error()
    }

    fn store(&self, outcome: ShortenOutcome) {
        *self.lock() = outcome;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ShortenOutcome> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
