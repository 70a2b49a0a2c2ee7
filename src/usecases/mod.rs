//! Application use cases. Orchestrate domain logic via ports.

pub mod shorten_service;

pub use shorten_service::ShortenService;
