//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{LINK_URL_KEY, LinkData, META_INPUT_KEY, ShortenOutcome};
pub use errors::{DomainError, ShortenErrorCode};
