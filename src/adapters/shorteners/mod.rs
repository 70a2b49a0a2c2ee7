//! Shortener adapters. Implement ShortenerPort for remote providers.
//!
//! Provides the tiny.cc adapter, URL validation/sanitization and a mock for testing.

pub mod mock;
pub mod tinycc;
pub mod url_safety;

pub use mock::MockShortener;
pub use tinycc::TinyCcShortener;
pub use url_safety::{EscUrlSanitizer, is_absolute_url};
