//! Infrastructure adapters. Implement ports.
//!
//! Shortener providers and the terminal UI.

pub mod shorteners;
pub mod ui;
